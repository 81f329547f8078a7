use std::fmt;

/// Classification assigned to a group of records by the threshold rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    /// Low hit rate and low refusal rate.
    Chance,
    /// High hit rate.
    Risk,
    /// Neither chance nor risk; uninformative for profiling.
    Inbetween,
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProfileType::Chance => "chance",
            ProfileType::Risk => "risk",
            ProfileType::Inbetween => "inbetween",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::ProfileType;

    #[test]
    fn display_lowercase() {
        assert_eq!(format!("{}", ProfileType::Chance), "chance");
        assert_eq!(format!("{}", ProfileType::Risk), "risk");
        assert_eq!(format!("{}", ProfileType::Inbetween), "inbetween");
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProfileType::Risk).unwrap(),
            "\"risk\""
        );
        let back: ProfileType = serde_json::from_str("\"chance\"").unwrap();
        assert_eq!(back, ProfileType::Chance);
    }
}
