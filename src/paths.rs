use crate::{config::Config, meeting::Meeting};

/// The location of a rendered meeting document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MeetingPath {
    /// The path relative to the repository root, with `/` separators.
    pub relative: String,
    /// Where the document can be viewed, if the repository URL is known.
    pub url: Option<String>,
}

/// Anything that can say where a meeting's document lives.
///
/// The renderer uses this to link to other meetings. It never touches the
/// file system itself.
pub trait PathOf {
    fn path_of(&self, meeting: &Meeting) -> MeetingPath;
}

/// The standard layout of agenda documents within a repository.
///
/// e.g., `agendas/2024/01-Jan/04-wg-primary.md`.
#[derive(Clone, Copy, Debug)]
pub struct RepoLayout<'c> {
    config: &'c Config,
}

impl<'c> RepoLayout<'c> {
    pub fn new(config: &'c Config) -> RepoLayout<'c> {
        RepoLayout { config }
    }
}

impl<'c> PathOf for RepoLayout<'c> {
    fn path_of(&self, meeting: &Meeting) -> MeetingPath {
        let mut relative = String::new();
        if let Some(ref subpath) = self.config.repo_subpath {
            relative.push_str(subpath);
            relative.push('/');
        }
        relative.push_str(
            self.config.agendas_folder.as_deref().unwrap_or("agendas"),
        );
        relative.push_str(&format!(
            "/{}/{:02}-{}.md",
            meeting.date.strftime("%Y/%m-%b"),
            meeting.day(),
            meeting.filename_fragment,
        ));
        let url = self
            .config
            .repo_url
            .as_ref()
            .map(|repo| format!("{repo}/blob/main/{relative}"));
        MeetingPath { relative, url }
    }
}
