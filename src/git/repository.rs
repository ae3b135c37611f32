use crate::config::TaggerIdentity;
use crate::domain::RepositoryTag;
use crate::error::{AutotagError, Result};
use crate::git::{CommitInfo, CommitStream};
use git2::{Cred, CredentialType, Oid, Repository as Git2Repo, Signature, Sort};
use std::cell::Cell;
use std::path::Path;
use tracing::{debug, info, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        debug!(path = %repo.path().display(), "opened repository");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn head_hash(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn list_tags(&self) -> Result<Vec<RepositoryTag>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    warn!(tag = name, error = %e, "skipping tag that does not point to a commit");
                    continue;
                }
            };

            // Lightweight tags carry no tagger signature.
            let timestamp = reference
                .peel_to_tag()
                .ok()
                .and_then(|tag| tag.tagger().map(|sig| sig.when().seconds()));

            tags.push(RepositoryTag::new(name, commit.id().to_string(), timestamp));
        }

        Ok(tags)
    }

    fn commits_since(&self, cutoff: Option<&str>) -> Result<CommitStream<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push_head()?;

        if let Some(hash) = cutoff {
            revwalk.hide(Oid::from_str(hash)?)?;
        }

        let repo = &self.repo;
        let commits = revwalk.map(
            move |oid: std::result::Result<Oid, git2::Error>| -> Result<CommitInfo> {
                let commit = repo.find_commit(oid?)?;
                let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
                let author = commit.author().name().unwrap_or("unknown").to_string();

                Ok(CommitInfo {
                    hash: commit.id().to_string(),
                    message,
                    author,
                })
            },
        );

        Ok(Box::new(commits))
    }

    fn create_tag(
        &self,
        name: &str,
        target: &str,
        message: &str,
        tagger: &TaggerIdentity,
    ) -> Result<()> {
        let oid = Oid::from_str(target)?;
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| AutotagError::tag(format!("Cannot find object {}: {}", target, e)))?;

        let signature = Signature::now(&tagger.name, &tagger.email)?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| AutotagError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        info!(tag = name, commit = target, "created annotated tag");
        Ok(())
    }

    fn push_tag(&self, remote_name: &str, name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|e| {
            AutotagError::remote(format!("Cannot find remote '{}': {}", remote_name, e))
        })?;

        let mut callbacks = git2::RemoteCallbacks::new();
        let attempts = CredentialAttempts::default();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            attempts.next(username_from_url, allowed_types)
        });
        callbacks.push_update_reference(|refname, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, reason
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{0}:refs/tags/{0}", name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                AutotagError::remote(format!(
                    "Failed to push tag '{}' to '{}': {}",
                    name, remote_name, e
                ))
            })?;

        info!(tag = name, remote = remote_name, "pushed tag");
        Ok(())
    }
}

/// Credential sources offered to libgit2 during one push.
///
/// libgit2 asks again after every rejected credential, so each source is
/// offered at most once: SSH keys from ~/.ssh, then the SSH agent, then
/// libgit2's default credentials. Once all are spent the push fails instead
/// of looping.
#[derive(Default)]
struct CredentialAttempts {
    ssh_key: Cell<bool>,
    ssh_agent: Cell<bool>,
    default: Cell<bool>,
}

impl CredentialAttempts {
    fn next(
        &self,
        username_from_url: Option<&str>,
        allowed_types: CredentialType,
    ) -> std::result::Result<Cred, git2::Error> {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if !self.ssh_key.replace(true) {
                if let Some(cred) = ssh_key_from_home(username) {
                    return Ok(cred);
                }
            }

            if !self.ssh_agent.replace(true) {
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }
        }

        if !self.default.replace(true) {
            return Cred::default();
        }

        debug!(username, "no credentials left to try");
        Err(git2::Error::from_str("authentication failed: all credentials were rejected"))
    }
}

fn ssh_key_from_home(username: &str) -> Option<Cred> {
    let ssh_dir = dirs::home_dir()?.join(".ssh");
    ["id_ed25519", "id_rsa", "id_ecdsa"]
        .iter()
        .map(|key| ssh_dir.join(key))
        .filter(|path| path.exists())
        .find_map(|path| Cred::ssh_key(username, None, &path, None).ok())
}
