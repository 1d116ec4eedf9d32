use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chat_assistant_core::tool::{Error as ToolError, Registry, Tool, Toolset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const DEFAULT_NUM_RESULTS: usize = 5;
const DEFAULT_SECTION: &str = "user added";

/// A question and answer pair in the knowledge base.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// The section this entry belongs to.
    pub section: String,
    /// The question.
    pub question: String,
    /// The answer to the question.
    #[serde(alias = "text")]
    pub answer: String,
}

impl Entry {
    fn score(&self, terms: &HashSet<String>) -> usize {
        let words: HashSet<String> = [&self.section, &self.question, &self.answer]
            .into_iter()
            .flat_map(|field| tokenize(field))
            .collect();
        terms.iter().filter(|term| words.contains(*term)).count()
    }
}

/// An in-memory FAQ the model can search and extend.
///
/// Clones share the same entries. Registering the knowledge base as a
/// [`Toolset`] adds two tools, `search` and `add_entry`.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl KnowledgeBase {
    /// Creates an empty knowledge base.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a knowledge base holding `entries`.
    #[inline]
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Loads entries from a JSON file holding an array of entries.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let entries: Vec<Entry> =
            serde_json::from_reader(BufReader::new(file))?;
        debug!(
            "loaded {} entries from {}",
            entries.len(),
            path.as_ref().display()
        );
        Ok(Self::with_entries(entries))
    }

    /// Returns a snapshot of all entries.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().clone()
    }

    /// Returns up to `num_results` entries that share the most words with
    /// `query`, best match first.
    ///
    /// Entries sharing no word with the query are never returned.
    pub fn search(&self, query: &str, num_results: usize) -> Vec<Entry> {
        let terms: HashSet<String> = tokenize(query).collect();
        let entries = self.lock();

        let mut scored: Vec<(usize, &Entry)> = entries
            .iter()
            .map(|entry| (entry.score(&terms), entry))
            .filter(|(score, _)| *score > 0)
            .collect();
        // Stable, so equally good entries keep their order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(num_results)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Appends an entry.
    pub fn add_entry(&self, entry: Entry) {
        trace!("adding entry: {entry:?}");
        self.lock().push(entry);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Toolset for KnowledgeBase {
    fn register(self, registry: &mut Registry) {
        registry.register(SearchTool(self.clone()));
        registry.register(AddEntryTool(self));
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Searches the FAQ database for entries matching the query.
#[derive(Deserialize, JsonSchema)]
struct SearchParameters {
    #[schemars(description = "The search query text.")]
    query: String,
    #[schemars(description = "How many entries to return, default to 5.")]
    num_results: Option<usize>,
}

struct SearchTool(KnowledgeBase);

impl Tool for SearchTool {
    type Input = SearchParameters;
    type Output = Vec<Entry>;

    fn name(&self) -> &str {
        "search"
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SearchParameters,
    ) -> impl Future<Output = Result<Vec<Entry>, ToolError>> + Send + 'static
    {
        let knowledge_base = self.0.clone();
        async move {
            let num_results = input.num_results.unwrap_or(DEFAULT_NUM_RESULTS);
            Ok(knowledge_base.search(&input.query, num_results))
        }
    }
}

/// Adds a new question and answer to the FAQ database.
#[derive(Deserialize, JsonSchema)]
struct AddEntryParameters {
    #[schemars(description = "The question being answered.")]
    question: String,
    #[schemars(description = "The answer to the question.")]
    answer: String,
    #[schemars(description = "Section to file the entry under, default to \"user added\".")]
    section: Option<String>,
}

struct AddEntryTool(KnowledgeBase);

impl Tool for AddEntryTool {
    type Input = AddEntryParameters;
    type Output = ();

    fn name(&self) -> &str {
        "add_entry"
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: AddEntryParameters,
    ) -> impl Future<Output = Result<(), ToolError>> + Send + 'static {
        let knowledge_base = self.0.clone();
        async move {
            if input.question.trim().is_empty() {
                return Err(ToolError::execution_error()
                    .with_reason("`question` must not be empty"));
            }
            knowledge_base.add_entry(Entry {
                section: input
                    .section
                    .unwrap_or_else(|| DEFAULT_SECTION.to_owned()),
                question: input.question,
                answer: input.answer,
            });
            Ok(())
        }
    }
}
