//! Compiled-in run configuration.
//!
//! Source lists, keyword tables, per-topic caps, and lookback windows live in
//! explicit structures handed to the bucket assembler, so a test (or a future
//! config file) can swap any of them without touching module state.

use std::collections::HashMap;

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Topics in output order.
    pub topics: Vec<TopicConfig>,
    /// Keyword tables and host lists shared by all topics.
    pub tagging: TaggerConfig,
}

/// One topic bucket: where to fetch from and how much to keep.
#[derive(Debug, Clone)]
pub struct TopicConfig {
    /// Stable key used in the JSON output.
    pub key: String,
    /// Display title for the Markdown digest.
    pub title: String,
    /// Maximum number of items the assembled bucket may hold.
    pub max_items: usize,
    /// Recency window in days, inclusive.
    pub lookback_days: i64,
    /// Sources in priority order; earlier sources win dedup collisions.
    pub sources: Vec<SourceConfig>,
}

/// A configured source for one topic.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// PubMed E-utilities search.
    PubMed {
        /// Search expression in PubMed advanced syntax.
        query: String,
        /// Maximum records this source may contribute.
        limit: usize,
        /// Tags applied to every record from this source.
        base_tags: Vec<String>,
    },
    /// arXiv Atom API search.
    Arxiv {
        /// Search expression in arXiv query syntax.
        query: String,
        /// Maximum records this source may contribute.
        limit: usize,
    },
    /// A syndicated RSS or Atom feed.
    Feed {
        /// Human-readable source name used on items.
        name: String,
        /// Feed URL.
        url: String,
    },
}

impl SourceConfig {
    /// Short label for log lines.
    pub fn label(&self) -> String {
        match self {
            SourceConfig::PubMed { .. } => "pubmed".to_string(),
            SourceConfig::Arxiv { .. } => "arxiv".to_string(),
            SourceConfig::Feed { name, .. } => format!("feed:{}", name),
        }
    }
}

/// One keyword-matching rule: a label earned by any of its keywords.
#[derive(Debug, Clone)]
pub struct TagRule {
    /// Label added to the item's tag set.
    pub label: String,
    /// Case-insensitive substrings matched against title + summary.
    pub keywords: Vec<String>,
}

impl TagRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Keyword tables per topic plus host lists for source-kind labels.
#[derive(Debug, Clone, Default)]
pub struct TaggerConfig {
    /// Topic key → keyword rules.
    pub rules: HashMap<String, Vec<TagRule>>,
    /// Hosts (or parent domains) that mark an item as a preprint.
    pub preprint_hosts: Vec<String>,
    /// Hosts (or parent domains) of journal publishers.
    pub journal_hosts: Vec<String>,
}

impl AppConfig {
    /// The production configuration: three topic buckets fed by PubMed,
    /// arXiv, and one journal feed each where available.
    pub fn default_config() -> Self {
        let q_ai = r#"(("artificial intelligence"[Title/Abstract]) OR "deep learning"[Title/Abstract] OR "machine learning"[Title/Abstract]) AND (medical OR clinical OR radiology OR genomics OR bioinformatics)"#;
        let q_micro = r#"(microfluidic OR "lab-on-a-chip" OR microdroplet) AND (biomedical OR diagnostic OR assay)"#;
        let q_bioinfo = r#"(bioinformatics OR "single-cell" OR genomics OR transcriptomics OR proteomics) AND (algorithm OR pipeline OR method OR benchmark)"#;

        let q_ai_arxiv = r#"(ti:"medical" OR abs:"medical" OR ti:"radiology" OR abs:"radiology" OR ti:"biomedical" OR abs:"biomedical") AND (cat:cs.CV OR cat:cs.LG OR cat:eess.IV)"#;
        let q_bioinfo_arxiv = r#"(ti:"genomics" OR abs:"genomics" OR ti:"bioinformatics" OR abs:"bioinformatics" OR ti:"single-cell" OR abs:"single-cell") AND (cat:q-bio.GN OR cat:q-bio.QM OR cat:cs.LG)"#;

        let peer_reviewed = vec!["Peer-reviewed".to_string()];

        let topics = vec![
            TopicConfig {
                key: "ai_biomed".to_string(),
                title: "AI in Biomedicine".to_string(),
                max_items: 40,
                lookback_days: 3,
                sources: vec![
                    SourceConfig::PubMed {
                        query: q_ai.to_string(),
                        limit: 40,
                        base_tags: peer_reviewed.clone(),
                    },
                    SourceConfig::Arxiv {
                        query: q_ai_arxiv.to_string(),
                        limit: 15,
                    },
                    SourceConfig::Feed {
                        name: "Nature Machine Intelligence".to_string(),
                        url: "https://www.nature.com/natmachintell.rss".to_string(),
                    },
                ],
            },
            TopicConfig {
                key: "microfluidics".to_string(),
                title: "Microfluidics".to_string(),
                max_items: 20,
                lookback_days: 3,
                sources: vec![
                    SourceConfig::PubMed {
                        query: q_micro.to_string(),
                        limit: 20,
                        base_tags: peer_reviewed.clone(),
                    },
                    SourceConfig::Feed {
                        name: "Lab on a Chip".to_string(),
                        url: "http://feeds.rsc.org/rss/lc".to_string(),
                    },
                ],
            },
            TopicConfig {
                key: "bioinfo".to_string(),
                title: "Bioinformatics".to_string(),
                max_items: 40,
                lookback_days: 3,
                sources: vec![
                    SourceConfig::PubMed {
                        query: q_bioinfo.to_string(),
                        limit: 20,
                        base_tags: peer_reviewed,
                    },
                    SourceConfig::Arxiv {
                        query: q_bioinfo_arxiv.to_string(),
                        limit: 10,
                    },
                    SourceConfig::Feed {
                        name: "bioRxiv Bioinformatics".to_string(),
                        url: "http://connect.biorxiv.org/biorxiv_xml.php?subject=bioinformatics"
                            .to_string(),
                    },
                ],
            },
        ];

        Self {
            topics,
            tagging: default_tagger_config(),
        }
    }
}

fn default_tagger_config() -> TaggerConfig {
    let mut rules = HashMap::new();
    rules.insert(
        "ai_biomed".to_string(),
        vec![
            TagRule::new("Deep learning", &["deep learning", "neural network", "transformer"]),
            TagRule::new("Cardiac MRI", &["cardiac mri", "cardiac magnetic resonance"]),
            TagRule::new("Radiology", &["radiology", "radiograph", "ct scan", "x-ray"]),
            TagRule::new("Genomics", &["genomic", "genome"]),
            TagRule::new("Clinical AI", &["clinical", "diagnosis", "diagnostic"]),
        ],
    );
    rules.insert(
        "microfluidics".to_string(),
        vec![
            TagRule::new("Lab-on-a-chip", &["lab-on-a-chip", "lab on a chip"]),
            TagRule::new("Droplet", &["droplet", "microdroplet"]),
            TagRule::new("Organ-on-a-chip", &["organ-on-a-chip", "organ on a chip"]),
            TagRule::new("Point-of-care", &["point-of-care", "point of care"]),
            TagRule::new("Diagnostics", &["diagnostic", "assay"]),
        ],
    );
    rules.insert(
        "bioinfo".to_string(),
        vec![
            TagRule::new("Single-cell", &["single-cell", "single cell", "scrna"]),
            TagRule::new("Transcriptomics", &["transcriptomic", "rna-seq"]),
            TagRule::new("Proteomics", &["proteomic"]),
            TagRule::new("Benchmark", &["benchmark"]),
            TagRule::new("Pipeline", &["pipeline", "workflow"]),
        ],
    );

    TaggerConfig {
        rules,
        preprint_hosts: vec![
            "arxiv.org".to_string(),
            "biorxiv.org".to_string(),
            "medrxiv.org".to_string(),
            "ssrn.com".to_string(),
        ],
        journal_hosts: vec![
            "nature.com".to_string(),
            "cell.com".to_string(),
            "sciencedirect.com".to_string(),
            "link.springer.com".to_string(),
            "onlinelibrary.wiley.com".to_string(),
            "academic.oup.com".to_string(),
            "pubs.rsc.org".to_string(),
            "science.org".to_string(),
        ],
    }
}
