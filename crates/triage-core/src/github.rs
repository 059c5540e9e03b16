//! GitHub REST implementation of [`Tracker`]
//!
//! Blocking requests, no retries and no client-side timeout: a command
//! either gets its answer or fails with the transport error.

use crate::issue::{Comment, Issue, IssueState, RepoInfo, User};
use crate::query::Query;
use crate::remote::RepoId;
use crate::tracker::Tracker;
use crate::{Error, Result};
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

const PER_PAGE: &str = "100";

/// What the client reads back from one HTTP exchange
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub url: String,
    /// `rel="next"` target of the `Link` header
    pub next: Option<String>,
    pub body: Vec<u8>,
}

/// Carries requests to the tracker. [`ReqwestTransport`] talks to the
/// network; tests substitute canned replies.
pub trait Transport {
    fn request(&self, method: Method, url: Url, body: Option<serde_json::Value>) -> Result<Reply>;
}

/// Blocking `reqwest` transport
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("token {}", token.trim()))
            .map_err(|_| Error::Config("token contains invalid characters".to_string()))?;
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = Client::builder()
            .user_agent(concat!("triage/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    fn request(&self, method: Method, url: Url, body: Option<serde_json::Value>) -> Result<Reply> {
        tracing::debug!(%method, %url, "request");
        let mut request = self.http.request(method, url);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.send()?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let next = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);
        let body = response.bytes()?.to_vec();
        tracing::debug!(%url, status, "tracker response");
        Ok(Reply {
            status,
            url,
            next,
            body,
        })
    }
}

pub struct GithubClient<T = ReqwestTransport> {
    transport: T,
    api_url: String,
    repo: RepoId,
}

#[derive(Deserialize)]
struct SearchPage {
    items: Vec<Issue>,
}

/// Writable subset of an issue
#[derive(Serialize)]
struct IssuePatch<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    state: IssueState,
    assignees: Vec<&'a str>,
    labels: Vec<&'a str>,
}

impl<'a> IssuePatch<'a> {
    fn from_issue(issue: &'a Issue) -> Self {
        Self {
            title: &issue.title,
            body: issue.body.as_deref(),
            state: issue.state,
            assignees: issue.assignee.iter().map(|u| u.login.as_str()).collect(),
            labels: issue.label_names(),
        }
    }
}

#[derive(Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

impl GithubClient {
    pub fn new(api_url: &str, token: &str, repo: RepoId) -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new(token)?, api_url, repo))
    }
}

impl<T: Transport> GithubClient<T> {
    pub fn with_transport(transport: T, api_url: &str, repo: RepoId) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.api_url, path))?)
    }

    fn repo_endpoint(&self, path: &str) -> Result<Url> {
        let path = if path.is_empty() {
            format!("repos/{}/{}", self.repo.owner, self.repo.name)
        } else {
            format!("repos/{}/{}/{}", self.repo.owner, self.repo.name, path)
        };
        self.endpoint(&path)
    }

    /// Send a request; non-2xx replies become [`Error::Api`]
    fn send(&self, method: Method, url: Url, body: Option<serde_json::Value>) -> Result<Reply> {
        let reply = self.transport.request(method, url, body)?;
        if !(200..300).contains(&reply.status) {
            return Err(Error::Api {
                status: reply.status,
                url: reply.url,
            });
        }
        Ok(reply)
    }

    fn get<D: DeserializeOwned>(&self, url: Url) -> Result<D> {
        let reply = self.send(Method::GET, url, None)?;
        Ok(serde_json::from_slice(&reply.body)?)
    }

    /// GET pages by following `Link: rel="next"`, handing each page's
    /// issues to `visit` until it returns false or the pages run out
    fn walk<P: DeserializeOwned>(
        &self,
        url: Url,
        items: fn(P) -> Vec<Issue>,
        mut visit: impl FnMut(Vec<Issue>) -> bool,
    ) -> Result<()> {
        let mut next = Some(url);
        while let Some(url) = next.take() {
            let reply = self.send(Method::GET, url, None)?;
            let page: P = serde_json::from_slice(&reply.body)?;
            if !visit(items(page)) {
                break;
            }
            next = reply.next.as_deref().map(Url::parse).transpose()?;
        }
        Ok(())
    }

    fn get_all<P: DeserializeOwned>(
        &self,
        url: Url,
        items: fn(P) -> Vec<Issue>,
    ) -> Result<Vec<Issue>> {
        let mut all = Vec::new();
        self.walk(url, items, |page| {
            all.extend(page);
            true
        })?;
        Ok(all)
    }

    fn issue_not_found(number: u64) -> impl FnOnce(Error) -> Error {
        move |err| match err {
            Error::Api { status: 404, .. } => Error::NotFound(number),
            other => other,
        }
    }
}

impl<T: Transport> Tracker for GithubClient<T> {
    fn issues(&self, state: IssueState, assigned: Option<&str>) -> Result<Vec<Issue>> {
        let mut url = self.repo_endpoint("issues")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("state", &state.to_string());
            pairs.append_pair("per_page", PER_PAGE);
            if let Some(who) = assigned.filter(|w| !w.is_empty()) {
                pairs.append_pair("assignee", who);
            }
        }
        let issues = self.get_all::<Vec<Issue>>(url, |page| page)?;
        Ok(issues.into_iter().filter(|i| !i.is_pull_request()).collect())
    }

    fn issue(&self, number: u64, with_comments: bool) -> Result<(Issue, Vec<Comment>)> {
        let issue: Issue = self
            .get(self.repo_endpoint(&format!("issues/{}", number))?)
            .map_err(Self::issue_not_found(number))?;

        let comments = if with_comments && issue.comments > 0 {
            let mut url = self.repo_endpoint(&format!("issues/{}/comments", number))?;
            url.query_pairs_mut().append_pair("per_page", PER_PAGE);
            self.get(url)?
        } else {
            Vec::new()
        };
        Ok((issue, comments))
    }

    fn patch_issue(&self, number: u64, issue: &Issue) -> Result<Issue> {
        let patch = serde_json::to_value(IssuePatch::from_issue(issue))?;
        let url = self.repo_endpoint(&format!("issues/{}", number))?;
        let reply = self
            .send(Method::PATCH, url, Some(patch))
            .map_err(Self::issue_not_found(number))?;
        Ok(serde_json::from_slice(&reply.body)?)
    }

    fn add_comment(&self, number: u64, body: &str) -> Result<Comment> {
        let url = self.repo_endpoint(&format!("issues/{}/comments", number))?;
        let comment = serde_json::to_value(NewComment { body })?;
        let reply = self
            .send(Method::POST, url, Some(comment))
            .map_err(Self::issue_not_found(number))?;
        Ok(serde_json::from_slice(&reply.body)?)
    }

    fn search_issues(&self, query: &Query) -> Result<Vec<Issue>> {
        let mut url = self.endpoint("search/issues")?;
        url.set_query(Some(&format!("{}&per_page={}", query, PER_PAGE)));
        self.get_all::<SearchPage>(url, |page| page.items)
    }

    fn repository(&self) -> Result<RepoInfo> {
        self.get(self.repo_endpoint("")?)
    }

    fn authenticated_user(&self) -> Result<User> {
        self.get(self.endpoint("user")?)
    }

    /// Walks the oldest-first listing until a page holds a real issue;
    /// stale pull requests can fill whole pages.
    fn least_recently_updated(&self, state: IssueState) -> Result<Option<Issue>> {
        let mut url = self.repo_endpoint("issues")?;
        url.query_pairs_mut()
            .append_pair("state", &state.to_string())
            .append_pair("sort", "updated")
            .append_pair("direction", "asc")
            .append_pair("per_page", PER_PAGE);
        let mut oldest = None;
        self.walk::<Vec<Issue>>(url, |page| page, |page| {
            oldest = page.into_iter().find(|i| !i.is_pull_request());
            oldest.is_none()
        })?;
        Ok(oldest)
    }
}

/// Extract the `rel="next"` target from a `Link` header
fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Some(target.to_string())
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GithubClient {
        GithubClient::new(api_url, "t0ken", "octocat/Hello-World".parse().unwrap()).unwrap()
    }

    #[test]
    fn test_next_link() {
        let header = r#"<https://api.github.com/repositories/1/issues?page=2>; rel="next", <https://api.github.com/repositories/1/issues?page=5>; rel="last""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/repositories/1/issues?page=2")
        );

        let last_page = r#"<https://api.github.com/repositories/1/issues?page=1>; rel="prev""#;
        assert_eq!(next_link(last_page), None);
    }

    #[test]
    fn test_repo_endpoints() {
        let c = client("https://api.github.com/");
        assert_eq!(
            c.repo_endpoint("issues/7").unwrap().as_str(),
            "https://api.github.com/repos/octocat/Hello-World/issues/7"
        );
        assert_eq!(
            c.repo_endpoint("").unwrap().as_str(),
            "https://api.github.com/repos/octocat/Hello-World"
        );
    }

    #[test]
    fn test_enterprise_base_keeps_prefix() {
        let c = client("https://ghe.example.com/api/v3");
        assert_eq!(
            c.endpoint("user").unwrap().as_str(),
            "https://ghe.example.com/api/v3/user"
        );
    }

    #[test]
    fn test_invalid_token() {
        let repo: RepoId = "o/r".parse().unwrap();
        assert!(matches!(
            GithubClient::new("https://api.github.com", "bad\ntoken", repo),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_patch_payload() {
        let mut issue = Issue::new(3, "Crash on start", "alice");
        issue.assignee = Some(User::new("bob"));
        let json = serde_json::to_value(IssuePatch::from_issue(&issue)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Crash on start",
                "state": "open",
                "assignees": ["bob"],
                "labels": []
            })
        );
    }

    mod transport_tests {
        use super::super::testing::FakeTransport;
        use super::*;
        use crate::{FilterSpec, build_query};
        use serde_json::{Value, json};

        const PAGE_2: &str = "https://api.test/repositories/1/issues?page=2";
        const PAGE_3: &str = "https://api.test/repositories/1/issues?page=3";

        fn fake_client(transport: FakeTransport) -> GithubClient<FakeTransport> {
            GithubClient::with_transport(transport, "https://api.test", "o/r".parse().unwrap())
        }

        fn issue_json(number: u64) -> Value {
            serde_json::to_value(Issue::new(number, format!("Issue {}", number), "alice")).unwrap()
        }

        fn pull_json(number: u64) -> Value {
            let mut pull = Issue::new(number, format!("Pull {}", number), "alice");
            pull.pull_request = Some(json!({ "url": "https://api.test/pulls/1" }));
            serde_json::to_value(pull).unwrap()
        }

        fn numbers(issues: &[Issue]) -> Vec<u64> {
            issues.iter().map(|i| i.number).collect()
        }

        #[test]
        fn test_issues_follow_pages_and_drop_pull_requests() {
            let transport = FakeTransport::default()
                .with_json("page=2", json!([issue_json(3)]))
                .with_page(
                    "repos/o/r/issues?",
                    json!([issue_json(1), pull_json(2)]),
                    PAGE_2,
                );
            let client = fake_client(transport);

            let issues = client.issues(IssueState::Open, Some("bob")).unwrap();
            assert_eq!(numbers(&issues), vec![1, 3]);

            let urls = client.transport.urls();
            assert_eq!(urls.len(), 2);
            assert_eq!(
                urls[0],
                "https://api.test/repos/o/r/issues?state=open&per_page=100&assignee=bob"
            );
            assert_eq!(urls[1], PAGE_2);
        }

        #[test]
        fn test_missing_issue_is_not_found() {
            let client = fake_client(FakeTransport::default());
            assert!(matches!(client.issue(9, true), Err(Error::NotFound(9))));
        }

        #[test]
        fn test_failed_request_is_api_error() {
            let transport = FakeTransport::default().with_reply(
                "/user",
                500,
                json!({ "message": "boom" }),
                None,
            );
            let client = fake_client(transport);
            match client.authenticated_user() {
                Err(Error::Api { status, url }) => {
                    assert_eq!(status, 500);
                    assert_eq!(url, "https://api.test/user");
                }
                other => panic!("expected an API error, got {:?}", other),
            }
        }

        #[test]
        fn test_search_reads_items() {
            let transport = FakeTransport::default().with_json(
                "search/issues",
                json!({ "total_count": 2, "items": [issue_json(4), issue_json(5)] }),
            );
            let client = fake_client(transport);
            let query = build_query("crash", "o/r", &FilterSpec::default());

            let issues = client.search_issues(&query).unwrap();
            assert_eq!(numbers(&issues), vec![4, 5]);
            assert!(client.transport.urls()[0].starts_with("https://api.test/search/issues?q=crash"));
        }

        #[test]
        fn test_least_recently_updated_skips_pages_of_pull_requests() {
            let stale_pulls: Vec<Value> = (1..=30).map(pull_json).collect();
            let transport = FakeTransport::default()
                .with_page("page=2", json!([pull_json(31), issue_json(99)]), PAGE_3)
                .with_page("repos/o/r/issues?", Value::Array(stale_pulls), PAGE_2);
            let client = fake_client(transport);

            let oldest = client.least_recently_updated(IssueState::Open).unwrap();
            assert_eq!(oldest.map(|i| i.number), Some(99));

            // found on page 2, page 3 is never requested
            let urls = client.transport.urls();
            assert_eq!(urls.len(), 2);
            assert!(urls[0].contains("sort=updated&direction=asc"));
        }

        #[test]
        fn test_least_recently_updated_without_issues() {
            let transport =
                FakeTransport::default().with_json("repos/o/r/issues?", json!([pull_json(1)]));
            let client = fake_client(transport);
            assert_eq!(client.least_recently_updated(IssueState::Open).unwrap(), None);
        }

        #[test]
        fn test_patch_sends_assignees() {
            let mut issue = Issue::new(7, "Crash", "alice");
            issue.assignee = Some(User::new("bob"));
            let transport = FakeTransport::default()
                .with_json("repos/o/r/issues/7", serde_json::to_value(&issue).unwrap());
            let client = fake_client(transport);

            let patched = client.patch_issue(7, &issue).unwrap();
            assert_eq!(patched.assignee_login(), "bob");

            let requests = client.transport.requests.borrow();
            let (method, _, body) = &requests[0];
            assert_eq!(*method, Method::PATCH);
            assert_eq!(body.as_ref().unwrap()["assignees"], json!(["bob"]));
        }
    }
}
