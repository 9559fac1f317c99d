// src/sources.rs

use std::fmt;

/// Electoral-result category published per election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Single-member district results, per candidate.
    Districts,
    /// Proportional-block results, per candidate.
    PrCandidates,
    /// Proportional-block results, per party.
    PrParties,
}

impl DataType {
    pub const ALL: [DataType; 3] = [
        DataType::Districts,
        DataType::PrCandidates,
        DataType::PrParties,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Districts => "districts",
            DataType::PrCandidates => "pr_candidates",
            DataType::PrParties => "pr_parties",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fetch → clean → publish unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub election_year: i32,
    pub election_number: u32,
    pub data_type: DataType,
    pub source_url: String,
}

impl SourceDescriptor {
    pub fn description(&self) -> String {
        format!(
            "{} {} (election #{})",
            self.election_year, self.data_type, self.election_number
        )
    }
}

/// General elections to stage, newest first: (year, election number).
static ELECTIONS: &[(i32, u32)] = &[(2024, 50), (2021, 49)];

/// Expand the election table into descriptors rooted at `base_url`.
///
/// Order is the table order, then `DataType::ALL` within each election.
pub fn election_sources(base_url: &str) -> Vec<SourceDescriptor> {
    let base = base_url.trim_end_matches('/');
    ELECTIONS
        .iter()
        .flat_map(|&(year, number)| {
            DataType::ALL.iter().map(move |&data_type| SourceDescriptor {
                election_year: year,
                election_number: number,
                data_type,
                source_url: format!("{}/hr{}_{}.csv", base, year, data_type),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_follow_table_order() {
        let sources = election_sources("https://example.org/data/");
        assert_eq!(sources.len(), 6);

        let order: Vec<(i32, DataType)> = sources
            .iter()
            .map(|s| (s.election_year, s.data_type))
            .collect();
        assert_eq!(
            order,
            vec![
                (2024, DataType::Districts),
                (2024, DataType::PrCandidates),
                (2024, DataType::PrParties),
                (2021, DataType::Districts),
                (2021, DataType::PrCandidates),
                (2021, DataType::PrParties),
            ]
        );
    }

    #[test]
    fn test_source_urls_and_numbers() {
        let sources = election_sources("https://yukiyanai.github.io/jp/resources/data");
        assert_eq!(
            sources[0].source_url,
            "https://yukiyanai.github.io/jp/resources/data/hr2024_districts.csv"
        );
        assert_eq!(
            sources[5].source_url,
            "https://yukiyanai.github.io/jp/resources/data/hr2021_pr_parties.csv"
        );
        assert_eq!(sources[0].election_number, 50);
        assert_eq!(sources[3].election_number, 49);
    }
}
