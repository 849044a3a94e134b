//! Taxonomic hierarchy strings in the rank-prefixed format used by QIIME
//! and metaphlan (`k__K; p__P; ... s__S`).

use serde::Serialize;

/// Single-letter rank prefixes, kingdom through species.
pub const RANKS: [&str; 7] = ["k", "p", "c", "o", "f", "g", "s"];

/// An ordered, rank-prefixed representation of one taxon's ancestry,
/// built from a CLARK lineage string and the organism's scientific name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaxonomyPath(Vec<String>);

impl TaxonomyPath {
    /// Build a taxonomy path from a semicolon-delimited lineage string and
    /// the standard "Scientific Name" of the organism.
    ///
    /// CLARK lineages run kingdom through genus; the species epithet is
    /// recovered from the scientific name when the lineage has exactly six
    /// levels, the name's first token matches the final lineage level, and
    /// at least one more token follows. Anything else (short or ragged
    /// lineages included) yields a correspondingly shorter path.
    ///
    /// ```
    /// use clark_biom::taxonomy::TaxonomyPath;
    ///
    /// let path = TaxonomyPath::from_lineage(
    ///     "Bacteria;Firmicutes;Bacilli;Bacillales;Bacillaceae;Bacillus",
    ///     "Bacillus subtilis",
    /// );
    /// assert_eq!(
    ///     path.levels(),
    ///     [
    ///         "k__Bacteria",
    ///         "p__Firmicutes",
    ///         "c__Bacilli",
    ///         "o__Bacillales",
    ///         "f__Bacillaceae",
    ///         "g__Bacillus",
    ///         "s__subtilis"
    ///     ]
    /// );
    /// ```
    pub fn from_lineage(lineage: &str, name: &str) -> Self {
        let levels: Vec<&str> = lineage.split(';').collect();
        let mut path: Vec<String> = RANKS
            .iter()
            .zip(levels.iter())
            .map(|(rank, level)| format!("{}__{}", rank, level))
            .collect();

        if path.len() == RANKS.len() - 1 {
            let tokens: Vec<&str> = name.split(' ').collect();
            if levels.last() == tokens.first() && tokens.len() > 1 {
                path.push(format!("s__{}", tokens[1..].join(" ")));
            }
        }

        TaxonomyPath(path)
    }

    pub fn levels(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for TaxonomyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}
