//! Build variants: one platform/toolchain paired with the tasks it runs.

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::{insert_present, ConfigObject, Document};

/// Template variables handed to a variant's tasks, in insertion order.
pub type Expansions = IndexMap<String, String>;

/// A reference to a task from the orchestrator's task catalog.
///
/// Task names (and tag selectors such as `.debug-compile !.sspi`) are opaque
/// here; nothing checks them against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    /// Run the task on any host in the variant's pool.
    Name(String),
    /// Run the task only on the listed distros.
    Restricted {
        /// Task name.
        name: String,
        /// Distros eligible to run the task.
        distros: Vec<String>,
    },
}

impl TaskRef {
    /// Reference `name` restricted to `distros`.
    pub fn on(name: &str, distros: &[&str]) -> Self {
        Self::Restricted {
            name: name.to_owned(),
            distros: distros.iter().map(|d| (*d).to_owned()).collect(),
        }
    }

    /// Task name, with or without a distro restriction.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Restricted { name, .. } => name,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Name(name) => Value::String(name.clone()),
            Self::Restricted { name, distros } => {
                let mut doc = Document::new();
                doc.insert("name".to_owned(), Value::String(name.clone()));
                doc.insert(
                    "distros".to_owned(),
                    Value::Array(distros.iter().cloned().map(Value::String).collect()),
                );
                Value::Object(doc)
            }
        }
    }
}

impl From<&str> for TaskRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

/// One named build configuration in the CI matrix.
///
/// Immutable once built; the optional fields are set through the
/// `with_*` builders at table construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    display_name: String,
    run_on: String,
    tasks: Vec<TaskRef>,
    expansions: Option<Expansions>,
    batchtime: Option<u32>,
}

impl Variant {
    /// Create a variant with no expansions and no batchtime.
    pub fn new(name: &str, display_name: &str, run_on: &str, tasks: Vec<TaskRef>) -> Self {
        Self {
            name: name.to_owned(),
            display_name: display_name.to_owned(),
            run_on: run_on.to_owned(),
            tasks,
            expansions: None,
            batchtime: None,
        }
    }

    /// Attach expansions visible to this variant's tasks.
    #[must_use]
    pub fn with_expansions(mut self, expansions: Expansions) -> Self {
        self.expansions = Some(expansions);
        self
    }

    /// Set the minimum number of minutes between scheduled runs.
    #[must_use]
    pub fn with_batchtime(mut self, minutes: u32) -> Self {
        self.batchtime = Some(minutes);
        self
    }

    /// Human-readable label, markers included.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Host pool the tasks run on.
    pub fn run_on(&self) -> &str {
        &self.run_on
    }

    /// Task references in declaration order.
    pub fn tasks(&self) -> &[TaskRef] {
        &self.tasks
    }

    /// Expansions, if any were attached.
    pub fn expansions(&self) -> Option<&Expansions> {
        self.expansions.as_ref()
    }

    /// Scheduling interval in minutes, if set.
    pub fn batchtime(&self) -> Option<u32> {
        self.batchtime
    }
}

impl ConfigObject for Variant {
    fn name(&self) -> &str {
        &self.name
    }

    /// Base fields followed by `display_name`, `expansions`, `run_on`,
    /// `tasks` and `batchtime`. Absent and empty values are both omitted.
    fn to_document(&self) -> Document {
        let mut doc = self.base_fields();
        insert_present(
            &mut doc,
            "display_name",
            Some(Value::String(self.display_name.clone())),
        );
        insert_present(
            &mut doc,
            "expansions",
            self.expansions.as_ref().map(|exp| {
                Value::Object(
                    exp.iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                )
            }),
        );
        insert_present(&mut doc, "run_on", Some(Value::String(self.run_on.clone())));
        insert_present(
            &mut doc,
            "tasks",
            Some(Value::Array(self.tasks.iter().map(TaskRef::to_value).collect())),
        );
        insert_present(&mut doc, "batchtime", self.batchtime.map(Value::from));
        doc
    }
}
