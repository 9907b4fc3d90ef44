//! Domain models for tally

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::Day;
use crate::error::Error;

/// A bank account the club holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankAccount {
    /// Account number as it appears in statement payee text
    pub id: String,
    pub name: String,
}

impl BankAccount {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Accounting category assigned to a bank transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayeeCategory {
    Accountant,
    Advertising,
    Airtable,
    BankFees,
    BankInterest,
    BarSales,
    BarSnacks,
    BarStock,
    BuildingMaintenance,
    BusinessRates,
    CardFees,
    CashDeposit,
    Cleaning,
    Donations,
    Electricity,
    EquipmentHire,
    EquipmentPurchase,
    FireAlarm,
    Gas,
    Grants,
    Insurance,
    InsuranceClaims,
    InternalTransfer,
    Internet,
    Kashflow,
    Legal,
    Licensing,
    LoanReceived,
    LoanRepayment,
    Memberships,
    MusicianCosts,
    MusicianPayments,
    OfficeSupplies,
    Paye,
    Pensions,
    PettyCash,
    PianoTuning,
    Printing,
    Prs,
    Refunds,
    Rent,
    Salaries,
    Security,
    ServiceCharge,
    Slack,
    SoundEngineering,
    Sponsorship,
    StaffExpenses,
    StaffTravel,
    StripeFees,
    Subscriptions,
    Telephone,
    TicketSales,
    Uncategorised,
    Vat,
    VatRefund,
    VenueHire,
    WasteCollection,
    Water,
    Website,
    WorkPermits,
}

impl PayeeCategory {
    /// Every category, in declaration order
    pub const ALL: [PayeeCategory; 61] = [
        Self::Accountant,
        Self::Advertising,
        Self::Airtable,
        Self::BankFees,
        Self::BankInterest,
        Self::BarSales,
        Self::BarSnacks,
        Self::BarStock,
        Self::BuildingMaintenance,
        Self::BusinessRates,
        Self::CardFees,
        Self::CashDeposit,
        Self::Cleaning,
        Self::Donations,
        Self::Electricity,
        Self::EquipmentHire,
        Self::EquipmentPurchase,
        Self::FireAlarm,
        Self::Gas,
        Self::Grants,
        Self::Insurance,
        Self::InsuranceClaims,
        Self::InternalTransfer,
        Self::Internet,
        Self::Kashflow,
        Self::Legal,
        Self::Licensing,
        Self::LoanReceived,
        Self::LoanRepayment,
        Self::Memberships,
        Self::MusicianCosts,
        Self::MusicianPayments,
        Self::OfficeSupplies,
        Self::Paye,
        Self::Pensions,
        Self::PettyCash,
        Self::PianoTuning,
        Self::Printing,
        Self::Prs,
        Self::Refunds,
        Self::Rent,
        Self::Salaries,
        Self::Security,
        Self::ServiceCharge,
        Self::Slack,
        Self::SoundEngineering,
        Self::Sponsorship,
        Self::StaffExpenses,
        Self::StaffTravel,
        Self::StripeFees,
        Self::Subscriptions,
        Self::Telephone,
        Self::TicketSales,
        Self::Uncategorised,
        Self::Vat,
        Self::VatRefund,
        Self::VenueHire,
        Self::WasteCollection,
        Self::Water,
        Self::Website,
        Self::WorkPermits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accountant => "ACCOUNTANT",
            Self::Advertising => "ADVERTISING",
            Self::Airtable => "AIRTABLE",
            Self::BankFees => "BANK_FEES",
            Self::BankInterest => "BANK_INTEREST",
            Self::BarSales => "BAR_SALES",
            Self::BarSnacks => "BAR_SNACKS",
            Self::BarStock => "BAR_STOCK",
            Self::BuildingMaintenance => "BUILDING_MAINTENANCE",
            Self::BusinessRates => "BUSINESS_RATES",
            Self::CardFees => "CARD_FEES",
            Self::CashDeposit => "CASH_DEPOSIT",
            Self::Cleaning => "CLEANING",
            Self::Donations => "DONATIONS",
            Self::Electricity => "ELECTRICITY",
            Self::EquipmentHire => "EQUIPMENT_HIRE",
            Self::EquipmentPurchase => "EQUIPMENT_PURCHASE",
            Self::FireAlarm => "FIRE_ALARM",
            Self::Gas => "GAS",
            Self::Grants => "GRANTS",
            Self::Insurance => "INSURANCE",
            Self::InsuranceClaims => "INSURANCE_CLAIMS",
            Self::InternalTransfer => "INTERNAL_TRANSFER",
            Self::Internet => "INTERNET",
            Self::Kashflow => "KASHFLOW",
            Self::Legal => "LEGAL",
            Self::Licensing => "LICENSING",
            Self::LoanReceived => "LOAN_RECEIVED",
            Self::LoanRepayment => "LOAN_REPAYMENT",
            Self::Memberships => "MEMBERSHIPS",
            Self::MusicianCosts => "MUSICIAN_COSTS",
            Self::MusicianPayments => "MUSICIAN_PAYMENTS",
            Self::OfficeSupplies => "OFFICE_SUPPLIES",
            Self::Paye => "PAYE",
            Self::Pensions => "PENSIONS",
            Self::PettyCash => "PETTY_CASH",
            Self::PianoTuning => "PIANO_TUNING",
            Self::Printing => "PRINTING",
            Self::Prs => "PRS",
            Self::Refunds => "REFUNDS",
            Self::Rent => "RENT",
            Self::Salaries => "SALARIES",
            Self::Security => "SECURITY",
            Self::ServiceCharge => "SERVICE_CHARGE",
            Self::Slack => "SLACK",
            Self::SoundEngineering => "SOUND_ENGINEERING",
            Self::Sponsorship => "SPONSORSHIP",
            Self::StaffExpenses => "STAFF_EXPENSES",
            Self::StaffTravel => "STAFF_TRAVEL",
            Self::StripeFees => "STRIPE_FEES",
            Self::Subscriptions => "SUBSCRIPTIONS",
            Self::Telephone => "TELEPHONE",
            Self::TicketSales => "TICKET_SALES",
            Self::Uncategorised => "UNCATEGORISED",
            Self::Vat => "VAT",
            Self::VatRefund => "VAT_REFUND",
            Self::VenueHire => "VENUE_HIRE",
            Self::WasteCollection => "WASTE_COLLECTION",
            Self::Water => "WATER",
            Self::Website => "WEBSITE",
            Self::WorkPermits => "WORK_PERMITS",
        }
    }

    /// Whether payments in this category carry VAT.
    ///
    /// No wildcard arm: adding a category without deciding its VAT treatment
    /// fails to compile.
    pub fn is_subject_to_vat(&self) -> bool {
        match self {
            Self::Accountant
            | Self::Advertising
            | Self::BarSales
            | Self::BarSnacks
            | Self::BarStock
            | Self::BuildingMaintenance
            | Self::CashDeposit
            | Self::Cleaning
            | Self::Electricity
            | Self::EquipmentHire
            | Self::EquipmentPurchase
            | Self::FireAlarm
            | Self::Gas
            | Self::Internet
            | Self::Kashflow
            | Self::Legal
            | Self::MusicianCosts
            | Self::OfficeSupplies
            | Self::PianoTuning
            | Self::Printing
            | Self::Prs
            | Self::Refunds
            | Self::Rent
            | Self::Security
            | Self::ServiceCharge
            | Self::Sponsorship
            | Self::Subscriptions
            | Self::Telephone
            | Self::TicketSales
            | Self::VenueHire
            | Self::WasteCollection
            | Self::Website => true,

            Self::Airtable
            | Self::BankFees
            | Self::BankInterest
            | Self::BusinessRates
            | Self::CardFees
            | Self::Donations
            | Self::Grants
            | Self::Insurance
            | Self::InsuranceClaims
            | Self::InternalTransfer
            | Self::Licensing
            | Self::LoanReceived
            | Self::LoanRepayment
            | Self::Memberships
            | Self::MusicianPayments
            | Self::Paye
            | Self::Pensions
            | Self::PettyCash
            | Self::Salaries
            | Self::Slack
            | Self::SoundEngineering
            | Self::StaffExpenses
            | Self::StaffTravel
            | Self::StripeFees
            | Self::Uncategorised
            | Self::Vat
            | Self::VatRefund
            | Self::Water
            | Self::WorkPermits => false,
        }
    }

    /// Whether this category is money coming in.
    ///
    /// No wildcard arm, as with [`PayeeCategory::is_subject_to_vat`].
    pub fn is_credit(&self) -> bool {
        match self {
            Self::BankInterest
            | Self::BarSales
            | Self::CashDeposit
            | Self::Donations
            | Self::Grants
            | Self::InsuranceClaims
            | Self::LoanReceived
            | Self::Memberships
            | Self::Sponsorship
            | Self::TicketSales
            | Self::VatRefund
            | Self::VenueHire => true,

            Self::Accountant
            | Self::Advertising
            | Self::Airtable
            | Self::BankFees
            | Self::BarSnacks
            | Self::BarStock
            | Self::BuildingMaintenance
            | Self::BusinessRates
            | Self::CardFees
            | Self::Cleaning
            | Self::Electricity
            | Self::EquipmentHire
            | Self::EquipmentPurchase
            | Self::FireAlarm
            | Self::Gas
            | Self::Insurance
            | Self::InternalTransfer
            | Self::Internet
            | Self::Kashflow
            | Self::Legal
            | Self::Licensing
            | Self::LoanRepayment
            | Self::MusicianCosts
            | Self::MusicianPayments
            | Self::OfficeSupplies
            | Self::Paye
            | Self::Pensions
            | Self::PettyCash
            | Self::PianoTuning
            | Self::Printing
            | Self::Prs
            | Self::Refunds
            | Self::Rent
            | Self::Salaries
            | Self::Security
            | Self::ServiceCharge
            | Self::Slack
            | Self::SoundEngineering
            | Self::StaffExpenses
            | Self::StaffTravel
            | Self::StripeFees
            | Self::Subscriptions
            | Self::Telephone
            | Self::Uncategorised
            | Self::Vat
            | Self::WasteCollection
            | Self::Water
            | Self::Website
            | Self::WorkPermits => false,
        }
    }
}

impl std::str::FromStr for PayeeCategory {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .iter()
            .find(|c| c.as_str() == normalized)
            .copied()
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for PayeeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank transaction as read from a statement, plus its working category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Id of the owning bank account
    pub account: String,
    /// Bank-assigned transaction id, when the statement provides one
    pub ftid: Option<String>,
    /// Bank transaction type, e.g. "DEB", "FPO", "BGC"
    pub transaction_type: Option<String>,
    pub payment_date: Day,
    pub payee: String,
    /// Signed amount; credits are positive
    pub amount: Decimal,
    pub category: PayeeCategory,
}

impl Transaction {
    /// A freshly-ingested transaction with no category yet
    pub fn new(
        account: impl Into<String>,
        payment_date: Day,
        payee: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account: account.into(),
            ftid: None,
            transaction_type: None,
            payment_date,
            payee: payee.into(),
            amount,
            category: PayeeCategory::Uncategorised,
        }
    }

    pub fn with_ftid(mut self, ftid: impl Into<String>) -> Self {
        self.ftid = Some(ftid.into());
        self
    }

    pub fn with_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    /// A copy of this transaction carrying `category`
    pub fn with_category(&self, category: PayeeCategory) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }

    /// Equal in every field except category
    pub fn is_duplicate_of(&self, other: &Transaction) -> bool {
        self.account == other.account
            && self.ftid == other.ftid
            && self.transaction_type == other.transaction_type
            && self.payment_date == other.payment_date
            && self.payee == other.payee
            && self.amount == other.amount
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// End-of-day balance for an account as reported by the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub account: String,
    pub date: Day,
    pub balance: Decimal,
}
