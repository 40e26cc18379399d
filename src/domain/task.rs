// ============================================================
// Layer 3 - bAbI Task Catalogue
// ============================================================
// The archive ships 20 QA tasks, each in two sample sizes:
//
//   tasks_1-20_v1-2/en/qa1_single-supporting-fact_train.txt     (1k)
//   tasks_1-20_v1-2/en-10k/qa1_single-supporting-fact_train.txt (10k)
//
// Task and SampleSize together pick the member files to read.
// Both parse from strings so the CLI can accept "qa2" or
// "two-supporting-facts" and "1k" / "10k".

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Root directory inside the tarball
const ARCHIVE_ROOT: &str = "tasks_1-20_v1-2";

/// Slug of every task, indexed by task number - 1
const TASK_SLUGS: [&str; 20] = [
    "single-supporting-fact",
    "two-supporting-facts",
    "three-supporting-facts",
    "two-arg-relations",
    "three-arg-relations",
    "yes-no-questions",
    "counting",
    "lists-sets",
    "simple-negation",
    "indefinite-knowledge",
    "basic-coreference",
    "conjunction",
    "compound-coreference",
    "time-reasoning",
    "basic-deduction",
    "basic-induction",
    "positional-reasoning",
    "size-reasoning",
    "path-finding",
    "agents-motivations",
];

/// One of the 20 bAbI QA tasks, numbered 1..=20
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct Task(u8);

impl Task {
    pub fn new(number: u8) -> Option<Self> {
        (1..=20).contains(&number).then_some(Self(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// e.g. "two-supporting-facts"
    pub fn slug(&self) -> &'static str {
        TASK_SLUGS[usize::from(self.0) - 1]
    }

    /// File stem without the split suffix, e.g. "qa2_two-supporting-facts"
    pub fn stem(&self) -> String {
        format!("qa{}_{}", self.0, self.slug())
    }
}

impl TryFrom<u8> for Task {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Task::new(number).ok_or_else(|| format!("task number {number} is not in 1..=20"))
    }
}

impl Default for Task {
    fn default() -> Self {
        // Two supporting facts is the task the classic RNN walkthrough uses
        Self(2)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

impl FromStr for Task {
    type Err = String;

    /// Accepts "2", "qa2", "two-supporting-facts" or "qa2_two-supporting-facts"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s      = s.trim().to_ascii_lowercase();
        let digits = s.strip_prefix("qa").unwrap_or(&s);
        let digits = digits.split('_').next().unwrap_or(digits);

        if let Ok(n) = digits.parse::<u8>() {
            return Task::try_from(n);
        }

        let slug = s.split_once('_').map(|(_, rest)| rest).unwrap_or(&s);
        TASK_SLUGS
            .iter()
            .position(|&t| t == slug)
            .map(|i| Self(i as u8 + 1))
            .ok_or_else(|| format!("unknown bAbI task '{s}'"))
    }
}

/// Training-set size variant shipped in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleSize {
    #[default]
    OneK,
    TenK,
}

impl SampleSize {
    /// Language directory inside the archive
    pub fn dir(&self) -> &'static str {
        match self {
            SampleSize::OneK => "en",
            SampleSize::TenK => "en-10k",
        }
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSize::OneK => f.write_str("1k"),
            SampleSize::TenK => f.write_str("10k"),
        }
    }
}

impl FromStr for SampleSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1k" | "1000" | "en"       => Ok(SampleSize::OneK),
            "10k" | "10000" | "en-10k" => Ok(SampleSize::TenK),
            other => Err(format!("unknown sample size '{other}' (expected 1k or 10k)")),
        }
    }
}

/// Which half of a task to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test  => "test",
        }
    }
}

/// Full member path of one split of a task inside the tarball
pub fn member_path(task: Task, size: SampleSize, split: Split) -> String {
    format!("{ARCHIVE_ROOT}/{}/{}_{}.txt", size.dir(), task.stem(), split.as_str())
}
