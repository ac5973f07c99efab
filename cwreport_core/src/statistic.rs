use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Aggregation applied both when querying the backend and when collapsing the
/// returned samples into one reported value.
///
/// Names outside the four reductions are kept verbatim in `Other`: they are
/// forwarded to the backend as-is and reduce to the sample count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statistic {
    Maximum,
    Minimum,
    Sum,
    Average,
    Other(String),
}

impl Statistic {
    /// Name used on the wire and as the datapoint field key.
    pub fn as_str(&self) -> &str {
        match self {
            Statistic::Maximum => "Maximum",
            Statistic::Minimum => "Minimum",
            Statistic::Sum => "Sum",
            Statistic::Average => "Average",
            Statistic::Other(name) => name,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "maximum" => Statistic::Maximum,
            "minimum" => Statistic::Minimum,
            "sum" => Statistic::Sum,
            "average" => Statistic::Average,
            _ => Statistic::Other(s.to_string()),
        })
    }
}

impl From<&str> for Statistic {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(statistic) => statistic,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Statistic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Statistic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Statistic::from(s.as_str()))
    }
}
