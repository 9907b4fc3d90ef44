//! Case-insensitive payee text matching
//!
//! Each helper accepts a single needle or any list of needles and matches if
//! any one of them does. Empty needles never match.

/// One or more strings to look for in a payee
pub trait Needles {
    fn any_needle<F: FnMut(&str) -> bool>(&self, f: F) -> bool;
}

impl Needles for str {
    fn any_needle<F: FnMut(&str) -> bool>(&self, mut f: F) -> bool {
        f(self)
    }
}

impl Needles for String {
    fn any_needle<F: FnMut(&str) -> bool>(&self, f: F) -> bool {
        self.as_str().any_needle(f)
    }
}

impl<T: AsRef<str>> Needles for [T] {
    fn any_needle<F: FnMut(&str) -> bool>(&self, mut f: F) -> bool {
        self.iter().any(|needle| f(needle.as_ref()))
    }
}

impl<T: AsRef<str>, const N: usize> Needles for [T; N] {
    fn any_needle<F: FnMut(&str) -> bool>(&self, f: F) -> bool {
        self.as_slice().any_needle(f)
    }
}

impl<T: AsRef<str>> Needles for Vec<T> {
    fn any_needle<F: FnMut(&str) -> bool>(&self, f: F) -> bool {
        self.as_slice().any_needle(f)
    }
}

impl<N: Needles + ?Sized> Needles for &N {
    fn any_needle<F: FnMut(&str) -> bool>(&self, f: F) -> bool {
        (**self).any_needle(f)
    }
}

fn matches_with<N, P>(payee: &str, needles: N, predicate: P) -> bool
where
    N: Needles,
    P: Fn(&str, &str) -> bool,
{
    let payee = payee.to_lowercase();
    needles.any_needle(|needle| {
        !needle.is_empty() && predicate(payee.as_str(), needle.to_lowercase().as_str())
    })
}

pub fn matches_start<N: Needles>(payee: &str, needles: N) -> bool {
    matches_with(payee, needles, |p, n| p.starts_with(n))
}

pub fn matches_end<N: Needles>(payee: &str, needles: N) -> bool {
    matches_with(payee, needles, |p, n| p.ends_with(n))
}

pub fn matches_anywhere<N: Needles>(payee: &str, needles: N) -> bool {
    matches_with(payee, needles, |p, n| p.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_needle_any_case() {
        assert!(matches_start("STRIPE PAYOUT", "stripe"));
        assert!(matches_start("stripe payout", "STRIPE"));
        assert!(matches_end("HCD SERVICE CHARGE", "Charge"));
        assert!(matches_anywhere("HMRC VAT 123456", "vat"));
        assert!(!matches_start("PAYOUT STRIPE", "stripe"));
        assert!(!matches_end("STRIPE PAYOUT", "stripe"));
    }

    #[test]
    fn test_any_needle_in_list() {
        assert!(matches_anywhere("TESCO STORES 2041", ["sainsbury", "tesco"]));
        assert!(!matches_anywhere("TESCO STORES 2041", ["sainsbury", "waitrose"]));

        let slice: &[&str] = &["edf energy", "octopus"];
        assert!(matches_start("OCTOPUS ENERGY", slice));

        let owned = vec!["alex hawthorne".to_string()];
        assert!(matches_anywhere("ALEX HAWTHORNE NEW VORTEX JAZZ", &owned));
    }

    #[test]
    fn test_empty_needles_never_match() {
        assert!(!matches_anywhere("ANYTHING", ""));
        let none: [&str; 0] = [];
        assert!(!matches_anywhere("ANYTHING", none));
    }
}
