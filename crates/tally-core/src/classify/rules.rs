//! The ordered payee rule chain
//!
//! Rules are tried in the order of [`RULES`] and the first one to return a
//! category wins. Several payees satisfy more than one rule (an Airtable card
//! payment line also mentions a transaction fee, HMRC VAT payments also start
//! with "hmrc", Stripe settlements of Mushroom ticket sales also mention
//! Stripe), so moving a rule changes results.

use rust_decimal::Decimal;

use super::matching::{matches_anywhere, matches_end, matches_start};
use super::PayeeClassifier;
use crate::date::Day;
use crate::models::{PayeeCategory, Transaction};

use PayeeCategory::*;

pub type Rule = fn(&PayeeClassifier, &Transaction) -> Option<PayeeCategory>;

pub const RULES: &[(&str, Rule)] = &[
    ("internal_transfer", maybe_internal_transfer),
    ("work_permits", maybe_work_permits),
    ("airtable", maybe_airtable),
    ("bank_fees", maybe_bank_fees),
    ("bank_interest", maybe_bank_interest),
    ("vat", maybe_vat),
    ("paye", maybe_paye),
    ("pensions", maybe_pensions),
    ("staff_expenses", maybe_staff_expenses),
    ("salaries", maybe_salaries),
    ("musician_payments", maybe_musician_payments),
    ("sound_engineering", maybe_sound_engineering),
    ("service_charge", maybe_service_charge),
    ("rent", maybe_rent),
    ("business_rates", maybe_business_rates),
    ("grants", maybe_grants),
    ("electricity", maybe_electricity),
    ("gas", maybe_gas),
    ("water", maybe_water),
    ("telephone", maybe_telephone),
    ("internet", maybe_internet),
    ("insurance_claims", maybe_insurance_claims),
    ("insurance", maybe_insurance),
    ("prs", maybe_prs),
    ("licensing", maybe_licensing),
    ("accountant", maybe_accountant),
    ("legal", maybe_legal),
    ("kashflow", maybe_kashflow),
    ("slack", maybe_slack),
    ("website", maybe_website),
    ("subscriptions", maybe_subscriptions),
    ("advertising", maybe_advertising),
    ("printing", maybe_printing),
    ("bar_stock", maybe_bar_stock),
    ("bar_snacks", maybe_bar_snacks),
    ("cleaning", maybe_cleaning),
    ("waste_collection", maybe_waste_collection),
    ("fire_alarm", maybe_fire_alarm),
    ("security", maybe_security),
    ("building_maintenance", maybe_building_maintenance),
    ("piano_tuning", maybe_piano_tuning),
    ("equipment_hire", maybe_equipment_hire),
    ("equipment_purchase", maybe_equipment_purchase),
    ("office_supplies", maybe_office_supplies),
    ("musician_costs", maybe_musician_costs),
    ("staff_travel", maybe_staff_travel),
    ("card_fees", maybe_card_fees),
    ("stripe_fees", maybe_stripe_fees),
    ("memberships", maybe_memberships),
    ("ticket_sales", maybe_ticket_sales),
    ("bar_sales", maybe_bar_sales),
    ("cash_deposit", maybe_cash_deposit),
    ("donations", maybe_donations),
    ("sponsorship", maybe_sponsorship),
    ("venue_hire", maybe_venue_hire),
    ("loan_repayment", maybe_loan_repayment),
    ("loan_received", maybe_loan_received),
    ("refunds", maybe_refunds),
    ("petty_cash", maybe_petty_cash),
];

/// Payees that are members of staff, as they appear at the start of payments
const STAFF: &[&str] = &[
    "pauline le divenac",
    "p le divenac",
    "k hingwan",
    "kitty hingwan",
    "o weir",
    "oliver weir",
    "d mensah",
];

/// Freelance sound engineers
const SOUND_ENGINEERS: &[&str] = &["t lambert", "tom lambert", "r okafor", "s brennan"];

/// Card processors that settle bar takings (credits) and charge fees (debits)
const CARD_PROCESSORS: &[&str] = &["zettle", "izettle", "sumup", "worldpay", "paypal"];

const INSURERS: &[&str] = &["hiscox", "aviva", "axa insurance", "zurich", "insurance"];

// Manually identified payments that share a payee with unrelated ones
const WORK_PERMIT_ONE_OFFS: &[((i32, u32, u32), &str)] = &[
    ((2022, 5, 20), "k hingwan vortex expensess"),
    ((2023, 2, 13), "p le divenac"),
];

const DONATION_ONE_OFFS: &[((i32, u32, u32), &str)] = &[((2020, 4, 3), "p le divenac")];

const REFUND_ONE_OFFS: &[((i32, u32, u32), &str)] = &[
    ((2021, 12, 20), "mushroom"),
    ((2020, 3, 23), "ticketweb"),
];

fn is_one_off(t: &Transaction, one_offs: &[((i32, u32, u32), &str)]) -> bool {
    one_offs.iter().any(|((y, m, d), needle)| {
        t.payment_date == Day::ymd(*y, *m, *d) && matches_anywhere(&t.payee, *needle)
    })
}

/// A small purchase: `-200 < amount < 0`
fn is_small_debit(t: &Transaction) -> bool {
    t.amount < Decimal::ZERO && t.amount > Decimal::from(-200)
}

fn maybe_internal_transfer(c: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    c.accounts()
        .iter()
        .any(|account| {
            matches_anywhere(&t.payee, format!("{} internet transfer", account.id).as_str())
        })
        .then_some(InternalTransfer)
}

fn maybe_work_permits(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (is_one_off(t, WORK_PERMIT_ONE_OFFS)
        || (t.is_debit()
            && matches_anywhere(&t.payee, ["certificate of sponsorship", "ukvi", "home office visa"])))
    .then_some(WorkPermits)
}

fn maybe_airtable(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, "airtable").then_some(Airtable)
}

fn maybe_bank_fees(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && matches_anywhere(
            &t.payee,
            [
                "non-sterling transaction fee",
                "non-sterling fee",
                "commission charges",
                "unpaid item fee",
                "account fee",
            ],
        ))
    .then_some(BankFees)
}

fn maybe_bank_interest(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit() && matches_anywhere(&t.payee, ["interest paid", "gross interest", "credit interest"]))
        .then_some(BankInterest)
}

fn maybe_vat(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    if !matches_anywhere(&t.payee, "hmrc vat") {
        return None;
    }
    Some(if t.is_credit() { VatRefund } else { Vat })
}

fn maybe_paye(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && (matches_start(&t.payee, "hmrc") || matches_anywhere(&t.payee, " paye")))
        .then_some(Paye)
}

fn maybe_pensions(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["nest pensions", "nest contribution", "the people's pension"])
        .then_some(Pensions)
}

fn maybe_staff_expenses(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_start(&t.payee, STAFF) && matches_anywhere(&t.payee, "expense"))
        .then_some(StaffExpenses)
}

fn maybe_salaries(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && (matches_start(&t.payee, STAFF) || matches_anywhere(&t.payee, "salary")))
        .then_some(Salaries)
}

// A bare musician name also turns up on unrelated payments, so require the
// club's own reference text alongside it.
fn maybe_musician_payments(c: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && matches_anywhere(&t.payee, c.musicians())
        && (matches_anywhere(&t.payee, "new vortex jazz") || matches_start(&t.payee, "vortex")))
    .then_some(MusicianPayments)
}

fn maybe_sound_engineering(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && (matches_start(&t.payee, SOUND_ENGINEERS)
            || matches_end(&t.payee, ["sound eng", "sound engineering"])))
    .then_some(SoundEngineering)
}

fn maybe_service_charge(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_anywhere(&t.payee, ["service charge", "service chg"]))
        .then_some(ServiceCharge)
}

fn maybe_rent(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && matches_anywhere(&t.payee, ["hackney co-op", "hackney cooperative", "hcd rent", "hcd ltd"]))
    .then_some(Rent)
}

fn maybe_business_rates(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && matches_anywhere(&t.payee, ["lb hackney", "hackney council", "business rates", "nndr"]))
    .then_some(BusinessRates)
}

fn maybe_grants(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit()
        && matches_anywhere(
            &t.payee,
            [
                "arts council",
                "national lottery",
                "hackney council",
                "culture recovery",
                "prs foundation",
                "help musicians",
            ],
        ))
    .then_some(Grants)
}

fn maybe_electricity(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["edf energy", "octopus energy", "bulb energy", "opus energy"])
        .then_some(Electricity)
}

fn maybe_gas(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["british gas", "corona energy"]).then_some(Gas)
}

fn maybe_water(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["thames water", "castle water", "everflow"]).then_some(Water)
}

fn maybe_telephone(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["bt group", "vodafone", "ee limited", "giffgaff"])
        .then_some(Telephone)
}

fn maybe_internet(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["hyperoptic", "virgin media", "plusnet", "community fibre"])
        .then_some(Internet)
}

fn maybe_insurance_claims(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit() && matches_anywhere(&t.payee, INSURERS)).then_some(InsuranceClaims)
}

fn maybe_insurance(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_anywhere(&t.payee, INSURERS)).then_some(Insurance)
}

fn maybe_prs(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_anywhere(&t.payee, ["prs for music", "performing right"]))
        .then_some(Prs)
}

fn maybe_licensing(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["licensing", "premises licence", "tv licence"]).then_some(Licensing)
}

fn maybe_accountant(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["haines watts", "accountancy", "bookkeeping"])
        .then_some(Accountant)
}

fn maybe_legal(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["solicitors", "legal services", "companies house"])
        .then_some(Legal)
}

fn maybe_kashflow(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, "kashflow").then_some(Kashflow)
}

fn maybe_slack(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_start(&t.payee, ["slack", "www.slack"]).then_some(Slack)
}

fn maybe_website(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["squarespace", "wix.com", "godaddy", "123-reg", "wpengine"])
        .then_some(Website)
}

fn maybe_subscriptions(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(
        &t.payee,
        [
            "dropbox",
            "google workspace",
            "gsuite",
            "microsoft",
            "adobe",
            "zoom.us",
            "mailchimp",
            "spotify",
        ],
    )
    .then_some(Subscriptions)
}

fn maybe_advertising(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(
        &t.payee,
        ["facebk", "facebook", "instagram", "jazzwise", "time out", "londonjazz"],
    )
    .then_some(Advertising)
}

fn maybe_printing(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["vistaprint", "printed.com", "solopress", "instantprint"])
        .then_some(Printing)
}

fn maybe_bar_stock(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && matches_anywhere(
            &t.payee,
            [
                "matthew clark",
                "east london brewing",
                "bibendum",
                "majestic",
                "london beer",
                "brewdog",
                "booker",
            ],
        ))
    .then_some(BarStock)
}

// Supermarkets also take large unrelated payments (e.g. a catering order for
// a private hire), so only small purchases count as bar snacks.
fn maybe_bar_snacks(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (is_small_debit(t)
        && matches_anywhere(
            &t.payee,
            ["tesco", "sainsbury", "waitrose", "lidl", "co-op group", "costco"],
        ))
    .then_some(BarSnacks)
}

fn maybe_cleaning(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["cleaning", "ocs group", "clean & green"]).then_some(Cleaning)
}

fn maybe_waste_collection(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["veolia", "biffa", "first mile", "trade waste"])
        .then_some(WasteCollection)
}

fn maybe_fire_alarm(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["fire protection", "chubb fire", "firesafe", "fire alarm"])
        .then_some(FireAlarm)
}

fn maybe_security(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(
        &t.payee,
        ["securitas", "bidvest noonan", "door supervisor", "security services"],
    )
    .then_some(Security)
}

fn maybe_building_maintenance(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(
        &t.payee,
        ["screwfix", "toolstation", "wickes", "b&q", "plumbing", "locksmith", "glazing"],
    )
    .then_some(BuildingMaintenance)
}

fn maybe_piano_tuning(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["piano tun", "markson pianos", "steinway", "piano service"])
        .then_some(PianoTuning)
}

fn maybe_equipment_hire(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    matches_anywhere(&t.payee, ["backline", "gear hire", "audio hire", "lmf hire"])
        .then_some(EquipmentHire)
}

fn maybe_equipment_purchase(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (matches_anywhere(
        &t.payee,
        ["thomann", "andertons", "gear4music", "richer sounds", "scan computers"],
    ) || (t.amount <= Decimal::from(-200) && matches_anywhere(&t.payee, ["amazon", "amzn"])))
    .then_some(EquipmentPurchase)
}

fn maybe_office_supplies(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (matches_anywhere(&t.payee, ["viking direct", "ryman", "staples"])
        || (is_small_debit(t) && matches_anywhere(&t.payee, ["amazon", "amzn"])))
    .then_some(OfficeSupplies)
}

fn maybe_musician_costs(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && matches_anywhere(
            &t.payee,
            [
                "premier inn",
                "travelodge",
                "trainline",
                "eurostar",
                "easyjet",
                "ryanair",
                "british airways",
                "national express",
            ],
        ))
    .then_some(MusicianCosts)
}

fn maybe_staff_travel(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit()
        && (matches_start(&t.payee, ["tfl", "uber"]) || matches_anywhere(&t.payee, "addison lee")))
    .then_some(StaffTravel)
}

fn maybe_card_fees(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_anywhere(&t.payee, CARD_PROCESSORS)).then_some(CardFees)
}

fn maybe_stripe_fees(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_anywhere(&t.payee, "stripe")).then_some(StripeFees)
}

// Mushroom ticket settlements also arrive via Stripe; they are ticket sales.
fn maybe_memberships(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit() && matches_anywhere(&t.payee, "stripe") && !matches_anywhere(&t.payee, "mushroom"))
        .then_some(Memberships)
}

fn maybe_ticket_sales(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit()
        && matches_anywhere(
            &t.payee,
            [
                "mushroom",
                "ticketweb",
                "wegottickets",
                "ticketsource",
                "eventbrite",
                "dice fm",
                "skiddle",
            ],
        ))
    .then_some(TicketSales)
}

fn maybe_bar_sales(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit() && matches_anywhere(&t.payee, CARD_PROCESSORS)).then_some(BarSales)
}

fn maybe_cash_deposit(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit()
        && (matches_start(&t.payee, ["cash", "counter credit"])
            || matches_anywhere(&t.payee, "cash paid in")))
    .then_some(CashDeposit)
}

fn maybe_donations(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (is_one_off(t, DONATION_ONE_OFFS)
        || (t.is_credit()
            && matches_anywhere(
                &t.payee,
                [
                    "donation",
                    "cafonline",
                    "charities aid",
                    "justgiving",
                    "gift aid",
                    "big give",
                ],
            )))
    .then_some(Donations)
}

fn maybe_sponsorship(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit() && matches_anywhere(&t.payee, "sponsor")).then_some(Sponsorship)
}

fn maybe_venue_hire(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit()
        && matches_anywhere(&t.payee, ["venue hire", "room hire", "private hire", "hire of venue"]))
    .then_some(VenueHire)
}

fn maybe_loan_repayment(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_anywhere(&t.payee, ["loan repayment", "bbl repayment", "loan rpmt"]))
        .then_some(LoanRepayment)
}

fn maybe_loan_received(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_credit()
        && matches_anywhere(&t.payee, ["bounce back loan", "bbl drawdown", "loan advance"]))
    .then_some(LoanReceived)
}

fn maybe_refunds(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (is_one_off(t, REFUND_ONE_OFFS) || (t.is_debit() && matches_anywhere(&t.payee, "refund")))
        .then_some(Refunds)
}

fn maybe_petty_cash(_: &PayeeClassifier, t: &Transaction) -> Option<PayeeCategory> {
    (t.is_debit() && matches_start(&t.payee, ["cash withdrawal", "atm ", "cashpoint"]))
        .then_some(PettyCash)
}
