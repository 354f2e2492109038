//! Per-interaction selection state.
//!
//! A multi-step interaction (pick a project, then type a description)
//! spans many evaluations: the host re-evaluates on every keystroke. The
//! choices made along the way live here, scoped to the engine instance and
//! reset whenever the interaction is cancelled or the command prefix
//! changes.

/// A project (or client) choice across evaluations.
///
/// The tagged variants replace the `-1`/`null` sentinel convention: `Unset`
/// always yields the picker, `None` means "explicitly no project" and must
/// never re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSelection {
    /// Not chosen yet; the selector must be shown.
    #[default]
    Unset,
    /// Explicitly chosen "no project".
    None,
    /// A concrete entity was chosen.
    Chosen(i64),
}

impl ProjectSelection {
    /// Whether a picker still has to be shown.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The chosen id, if a concrete entity was picked.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Chosen(id) => Some(*id),
            _ => None,
        }
    }

    /// Convert a resolved choice into the optional id a mutation carries.
    ///
    /// `Unset` maps to `None` as well; callers gate on [`Self::is_unset`]
    /// before building mutations.
    pub fn as_project_id(&self) -> Option<i64> {
        self.id()
    }
}

/// Where the current edit interaction stands with respect to a project
/// reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditStage {
    /// Editing without touching the project; the selection is seeded from
    /// the running entry.
    #[default]
    NoProjectChange,
    /// `-p` was given: the picker is showing.
    NoProjectSelected,
    /// A project was explicitly reselected this interaction.
    ProjectSelected,
}

/// Mutable selection state carried across evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub project: ProjectSelection,
    pub edit_stage: EditStage,
    last_command: Option<String>,
}

impl SessionState {
    /// Fresh state with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every selection.
    pub fn reset(&mut self) {
        self.project = ProjectSelection::Unset;
        self.edit_stage = EditStage::default();
        self.last_command = None;
    }

    /// Record the command of the current evaluation, resetting selections
    /// when the command prefix changed since the last one.
    pub fn note_command(&mut self, command: &str) {
        if self.last_command.as_deref() != Some(command) {
            self.project = ProjectSelection::Unset;
            self.edit_stage = EditStage::default();
            self.last_command = Some(command.to_string());
        }
    }

    /// Apply the selection recorded on an invoked selector action.
    pub fn apply(&mut self, update: &SessionUpdate) {
        if let Some(project) = update.project {
            self.project = project;
        }
        if let Some(stage) = update.edit_stage {
            self.edit_stage = stage;
        }
    }
}

/// Selection changes a selector action persists when invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub project: Option<ProjectSelection>,
    pub edit_stage: Option<EditStage>,
}

impl SessionUpdate {
    /// An update that changes nothing (plain rewrites).
    pub fn none() -> Self {
        Self::default()
    }

    /// Persist a project choice.
    pub fn project(selection: ProjectSelection) -> Self {
        Self { project: Some(selection), edit_stage: None }
    }

    /// Persist a project choice and an edit-stage transition together.
    pub fn project_and_stage(selection: ProjectSelection, stage: EditStage) -> Self {
        Self { project: Some(selection), edit_stage: Some(stage) }
    }
}
