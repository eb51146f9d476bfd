//! Typed client for the GitHub git-data and pulls REST surface
//!
//! Wraps the endpoints the publisher needs with explicit status-code
//! handling: every non-success response becomes [`Error::Api`] carrying the
//! step name, status, and body. Existence checks return a tagged
//! [`RefLookup`] instead of sniffing message fields out of the body.

use crate::error::{Error, Result};
use crate::types::{CommitInfo, DEFAULT_API_BASE, GitAuthor, PullRequest, RepoId};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("pr-forge/", env!("CARGO_PKG_VERSION"));

/// Outcome of looking up a ref or branch tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefLookup {
    /// The ref exists and points at this commit
    Found {
        /// Commit SHA at the tip
        sha: String,
    },
    /// The ref does not exist (HTTP 404)
    NotFound,
}

/// One entry of a tree-creation request, layered over the base tree by path
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path within the repository
    pub path: String,
    /// Git file mode
    pub mode: String,
    /// Object type, always `blob` for file changes
    #[serde(rename = "type")]
    pub entry_type: &'static str,
    /// Blob SHA produced by blob creation
    pub sha: String,
}

impl TreeEntry {
    /// Create a blob entry
    pub fn blob(path: String, mode: String, sha: String) -> Self {
        Self {
            path,
            mode,
            entry_type: "blob",
            sha,
        }
    }
}

#[derive(Deserialize)]
struct RefObject {
    object: RefTarget,
}

#[derive(Deserialize)]
struct RefTarget {
    sha: String,
}

#[derive(Deserialize)]
struct RepoMeta {
    default_branch: String,
}

#[derive(Deserialize)]
struct BranchInfo {
    commit: BranchCommit,
}

#[derive(Deserialize)]
struct BranchCommit {
    sha: String,
}

#[derive(Deserialize)]
struct CommitObject {
    sha: String,
    tree: TreeRef,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct TreeRef {
    sha: String,
}

#[derive(Deserialize)]
struct ShaOnly {
    sha: String,
}

#[derive(Serialize)]
struct CreateBlobPayload {
    content: String,
    encoding: &'static str,
}

#[derive(Serialize)]
struct CreateTreePayload<'a> {
    base_tree: &'a str,
    tree: &'a [TreeEntry],
}

#[derive(Serialize)]
struct CreateCommitPayload<'a> {
    message: &'a str,
    tree: &'a str,
    parents: [&'a str; 1],
    author: &'a GitAuthor,
}

#[derive(Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct UpdateRefPayload<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
    base: PullRef,
    head: PullRef,
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct PullRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Serialize)]
struct CreatePullPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
}

impl From<PullResponse> for PullRequest {
    fn from(pr: PullResponse) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url,
            base_ref: pr.base.name,
            head_ref: pr.head.name,
            title: pr.title,
        }
    }
}

/// GitHub API client bound to one repository
///
/// The base URL is configurable so enterprise instances (and test servers)
/// can be targeted.
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    token: String,
    api_base: String,
    repo: RepoId,
}

impl GitHubClient {
    /// Create a client for a repository
    pub fn new(token: impl Into<String>, repo: RepoId, api: Option<&str>) -> Result<Self> {
        let api = api.unwrap_or(DEFAULT_API_BASE);
        let api_base = Url::parse(api)
            .map_err(|e| Error::Parse(format!("invalid API base URL `{api}`: {e}")))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            token: token.into(),
            api_base: api_base.as_str().trim_end_matches('/').to_string(),
            repo,
        })
    }

    /// The repository this client targets
    pub const fn repo(&self) -> &RepoId {
        &self.repo
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}{}", self.api_base, self.repo, path)
    }

    /// Percent-encode a branch name for use in a URL path
    ///
    /// Refnames may legally contain characters like `#` and `%` that would
    /// otherwise be parsed as fragment or escape syntax. Path separators
    /// are kept so hierarchical branch names (`feat/x`) stay hierarchical.
    fn encode_branch(branch: &str) -> String {
        branch
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("authorization", format!("token {}", self.token))
            .header("accept", "application/vnd.github+json")
    }

    /// Look up the ref for a branch
    ///
    /// 200 means the branch exists (SHA captured); 404 means it does not.
    /// Anything else is an API error.
    pub async fn get_branch_ref(&self, branch: &str) -> Result<RefLookup> {
        let url = self.repo_url(&format!("/git/refs/heads/{}", Self::encode_branch(branch)));
        debug!(%branch, "looking up branch ref");

        let resp = self.auth(self.client.get(&url)).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!(%branch, "branch ref not found");
                Ok(RefLookup::NotFound)
            }
            _ => {
                let r: RefObject = expect_json("ref lookup", resp).await?;
                debug!(%branch, sha = %r.object.sha, "branch ref found");
                Ok(RefLookup::Found { sha: r.object.sha })
            }
        }
    }

    /// Fetch the repository's default branch name
    pub async fn default_branch(&self) -> Result<String> {
        let url = self.repo_url("");
        debug!(repo = %self.repo, "fetching repository metadata");

        let resp = self.auth(self.client.get(&url)).send().await?;
        let meta: RepoMeta = expect_json("repository metadata", resp).await?;
        debug!(default_branch = %meta.default_branch, "repository metadata received");
        Ok(meta.default_branch)
    }

    /// Fetch the tip commit SHA of a branch
    pub async fn branch_tip(&self, branch: &str) -> Result<RefLookup> {
        let url = self.repo_url(&format!("/branches/{}", Self::encode_branch(branch)));
        debug!(%branch, "fetching branch tip");

        let resp = self.auth(self.client.get(&url)).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(RefLookup::NotFound),
            _ => {
                let info: BranchInfo = expect_json("branch tip", resp).await?;
                debug!(%branch, sha = %info.commit.sha, "branch tip received");
                Ok(RefLookup::Found {
                    sha: info.commit.sha,
                })
            }
        }
    }

    /// Fetch a commit object and return its tree SHA
    pub async fn commit_tree_sha(&self, commit_sha: &str) -> Result<String> {
        let url = self.repo_url(&format!("/git/commits/{commit_sha}"));
        debug!(%commit_sha, "fetching commit object");

        let resp = self.auth(self.client.get(&url)).send().await?;
        let commit: CommitObject = expect_json("commit lookup", resp).await?;
        debug!(tree_sha = %commit.tree.sha, "commit object received");
        Ok(commit.tree.sha)
    }

    /// Create a blob from raw contents, returning its SHA
    pub async fn create_blob(&self, contents: &[u8]) -> Result<String> {
        let url = self.repo_url("/git/blobs");
        let payload = CreateBlobPayload {
            content: BASE64.encode(contents),
            encoding: "base64",
        };

        let resp = self
            .auth(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        let blob: ShaOnly = expect_json("blob creation", resp).await?;
        debug!(sha = %blob.sha, "blob created");
        Ok(blob.sha)
    }

    /// Create a tree layering `entries` over `base_tree`, returning its SHA
    ///
    /// Paths not named in `entries` are inherited from the base tree by the
    /// API's tree-merge semantics.
    pub async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        let url = self.repo_url("/git/trees");
        debug!(%base_tree, entries = entries.len(), "creating tree");

        let payload = CreateTreePayload {
            base_tree,
            tree: entries,
        };
        let resp = self
            .auth(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        let tree: ShaOnly = expect_json("tree creation", resp).await?;
        debug!(sha = %tree.sha, "tree created");
        Ok(tree.sha)
    }

    /// Create a commit with a single parent
    pub async fn create_commit(
        &self,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
        author: &GitAuthor,
    ) -> Result<CommitInfo> {
        let url = self.repo_url("/git/commits");
        debug!(%tree_sha, %parent_sha, "creating commit");

        let payload = CreateCommitPayload {
            message,
            tree: tree_sha,
            parents: [parent_sha],
            author,
        };
        let resp = self
            .auth(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        let commit: CommitObject = expect_json("commit creation", resp).await?;
        debug!(sha = %commit.sha, "commit created");

        Ok(CommitInfo {
            sha: commit.sha,
            html_url: commit.html_url,
            message: commit.message,
        })
    }

    /// Create a new branch ref pointing at a commit
    pub async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let url = self.repo_url("/git/refs");
        debug!(%branch, %sha, "creating ref");

        let payload = CreateRefPayload {
            ref_name: format!("refs/heads/{branch}"),
            sha,
        };
        let resp = self
            .auth(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        let _: RefObject = expect_json("ref creation", resp).await?;
        Ok(())
    }

    /// Move an existing branch ref to a commit
    ///
    /// Forced, so a branch that moved since it was read is overwritten
    /// (last-write-wins).
    pub async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let url = self.repo_url(&format!("/git/refs/heads/{}", Self::encode_branch(branch)));
        debug!(%branch, %sha, "updating ref");

        let payload = UpdateRefPayload { sha, force: true };
        let resp = self
            .auth(self.client.patch(&url))
            .json(&payload)
            .send()
            .await?;
        let _: RefObject = expect_json("ref update", resp).await?;
        Ok(())
    }

    /// List open pull requests whose head is `branch`
    pub async fn list_open_pulls(&self, branch: &str) -> Result<Vec<PullRequest>> {
        let url = self.repo_url("/pulls");
        let head = format!("{}:{}", self.repo.owner, branch);
        debug!(%head, "listing open pull requests");

        let resp = self
            .auth(self.client.get(&url))
            .query(&[("head", head.as_str()), ("state", "open")])
            .send()
            .await?;
        let pulls: Vec<PullResponse> = expect_json("pull request lookup", resp).await?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    /// Open a pull request from `head` into `base`
    pub async fn create_pull(&self, title: &str, head: &str, base: &str) -> Result<PullRequest> {
        let url = self.repo_url("/pulls");
        debug!(%head, %base, "creating pull request");

        let payload = CreatePullPayload { title, head, base };
        let resp = self
            .auth(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        let pr: PullResponse = expect_json("pull request creation", resp).await?;
        debug!(number = pr.number, "pull request created");
        Ok(pr.into())
    }
}

/// Decode a response body, turning non-success statuses into [`Error::Api`]
async fn expect_json<T: DeserializeOwned>(step: &'static str, resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            step,
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.json().await?)
}
