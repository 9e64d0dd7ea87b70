//! Matching of desired records against a zone's existing record set.

use crate::names::normalize;
use crate::types::ProviderRecord;

/// Which fields must agree for an existing record to count as the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Name and type. Used by upsert: the matched record gets overwritten.
    NameAndType,
    /// Name, type and data. Used by delete so only exact records are removed.
    NameTypeAndData,
}

impl MatchPolicy {
    fn matches(self, candidate: &ProviderRecord, desired: &ProviderRecord, zone: &str) -> bool {
        if desired.is_persisted() && candidate.id == desired.id {
            return true;
        }
        let same_key = candidate.record_type == desired.record_type
            && normalize(&candidate.name, zone) == normalize(&desired.name, zone);
        match self {
            Self::NameAndType => same_key,
            Self::NameTypeAndData => same_key && candidate.data == desired.data,
        }
    }
}

/// Find the existing record `desired` refers to.
///
/// A non-zero id on `desired` matches a candidate with that id regardless of the other
/// fields. Otherwise the policy decides. Type comparison is case-sensitive.
///
/// When several candidates qualify the first one in `existing` wins, so with duplicate
/// name/type pairs the result depends on the order the provider listed them in.
pub fn find<'a>(
    existing: &'a [ProviderRecord],
    desired: &ProviderRecord,
    zone: &str,
    policy: MatchPolicy,
) -> Option<&'a ProviderRecord> {
    matching(existing, desired, zone, policy).next()
}

/// Every record in `existing` that [`find`] would accept, in list order.
pub fn matching<'a, 'b>(
    existing: &'a [ProviderRecord],
    desired: &'b ProviderRecord,
    zone: &'b str,
    policy: MatchPolicy,
) -> impl Iterator<Item = &'a ProviderRecord> + use<'a, 'b> {
    existing
        .iter()
        .filter(move |candidate| policy.matches(candidate, desired, zone))
}
