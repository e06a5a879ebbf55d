//! Interactive list browsing from the terminal.
//!
//! Every plain input line is one change of the search box and goes through
//! the controller's debounce; `:`-prefixed lines are commands.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use yansi::Paint;

use crate::api::{table_headers, ApiClient, ResourceSource};
use crate::list::{Filters, ListController, ListOptions, ListStatus, Notifier, ToastReceiver};
use crate::models::{validate_filter, Resource, RowView};
use crate::output::{print_list_state, print_toast};
use crate::session::Claims;

const HELP: &str = "Type to search (debounced). Commands: :page N, :next, :prev, :per-page N, \
:filter KEY VALUE, :clear KEY, :clear, :reload, :help, :quit";

/// Upper bound on waiting for the last request once input has ended.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Page(u32),
    Next,
    Prev,
    PerPage(u32),
    Filter(String, String),
    Clear(String),
    ClearAll,
    Reload,
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return Ok(BrowseCommand::Search(trimmed.to_string()));
        };
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("");
        let number = |arg: Option<&str>, what: &str| -> Result<u32, String> {
            arg.and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| format!(":{} needs a {}", name, what))
        };
        match name {
            "page" | "p" => Ok(BrowseCommand::Page(number(words.next(), "page number")?)),
            "next" | "n" => Ok(BrowseCommand::Next),
            "prev" => Ok(BrowseCommand::Prev),
            "per-page" | "pp" => Ok(BrowseCommand::PerPage(number(words.next(), "page size")?)),
            "filter" | "f" => {
                let key = words.next().ok_or_else(|| ":filter needs KEY VALUE".to_string())?;
                let value = words.collect::<Vec<_>>().join(" ");
                Ok(BrowseCommand::Filter(key.to_string(), value))
            }
            "clear" => Ok(match words.next() {
                Some(key) => BrowseCommand::Clear(key.to_string()),
                None => BrowseCommand::ClearAll,
            }),
            "reload" | "r" => Ok(BrowseCommand::Reload),
            "help" | "h" | "?" => Ok(BrowseCommand::Help),
            "quit" | "q" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(format!("Unknown command ':{}'. {}", other, HELP)),
        }
    }
}

fn apply(controller: &ListController<RowView>, resource: Resource, claims: &Claims, notifier: &Notifier, cmd: BrowseCommand) {
    let locked = |key: &str| claims.role.is_branch_scoped() && key == "branch_id";
    match cmd {
        BrowseCommand::Search(text) => controller.input_search(&text),
        BrowseCommand::Page(n) => controller.set_page(n),
        BrowseCommand::Next => controller.next_page(),
        BrowseCommand::Prev => controller.prev_page(),
        BrowseCommand::PerPage(n) => controller.set_per_page(n),
        BrowseCommand::Filter(key, _) | BrowseCommand::Clear(key) if locked(&key) => {
            notifier.warning("Branch users are limited to their own branch")
        }
        BrowseCommand::Filter(key, value) => match validate_filter(resource, &key, &value) {
            Ok(()) => controller.set_filter(&key, &value),
            Err(e) => notifier.warning(e.to_string()),
        },
        BrowseCommand::Clear(key) => controller.clear_filter(&key),
        BrowseCommand::ClearAll => {
            let mut baseline = Filters::default();
            claims.scope_filters(&mut baseline);
            controller.reset_filters(baseline);
        }
        BrowseCommand::Reload => controller.refresh(),
        BrowseCommand::Help => println!("{}", Paint::new(HELP).dim()),
        BrowseCommand::Quit => {}
    }
}

fn render(controller: &ListController<RowView>, title: &str, headers: &[String]) {
    let state = controller.snapshot();
    if state.status == ListStatus::Loading {
        println!("{}", Paint::new(format!("Loading page {}…", state.displayed_page())).dim());
    } else {
        print_list_state(title, headers, &state);
    }
}

/// Run the interactive browser until `:quit` or end of input.
pub async fn run_browse(client: ApiClient, resource: Resource, claims: Claims, mut options: ListOptions) {
    claims.scope_filters(&mut options.filters);
    let debounce = options.debounce;
    let (notifier, mut toasts): (Notifier, ToastReceiver) = Notifier::channel();
    let controller = ListController::new(ResourceSource::new(client, resource), options, notifier.clone());
    let mut changes = controller.subscribe();
    let headers = table_headers(resource);
    let title = resource.label();

    println!("{}", Paint::new(HELP).dim());
    controller.load();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match BrowseCommand::parse(&line) {
                    Ok(BrowseCommand::Quit) => return,
                    Ok(cmd) => apply(&controller, resource, &claims, &notifier, cmd),
                    Err(msg) => notifier.warning(msg),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(%e, "Failed to read input");
                    break;
                }
            },
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
                render(&controller, title, &headers);
            }
            Some(toast) = toasts.recv() => print_toast(&toast),
        }
    }

    // Input ended (piped stdin): let a pending search commit and the last request finish.
    let settle = async {
        tokio::time::sleep(debounce).await;
        while controller.status() == ListStatus::Loading {
            tokio::select! {
                changed = changes.changed() => if changed.is_err() { break },
                Some(toast) = toasts.recv() => print_toast(&toast),
            }
        }
    };
    if tokio::time::timeout(SETTLE_TIMEOUT, settle).await.is_err() {
        eprintln!("{}", Paint::new("Gave up waiting for the last request").yellow());
    }
    render(&controller, title, &headers);
    while let Ok(toast) = toasts.try_recv() {
        print_toast(&toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;

    use crate::api::ApiError;
    use crate::list::{ListQuery, PageSource};
    use crate::models::{Page, Pagination};
    use crate::session::Role;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<ListQuery>>,
    }

    impl PageSource<RowView> for RecordingSource {
        fn fetch(&self, query: ListQuery) -> BoxFuture<'static, Result<Page<RowView>, ApiError>> {
            self.calls.lock().unwrap().push(query.clone());
            async move {
                Ok(Page {
                    rows: Vec::new(),
                    pagination: Pagination::first(query.per_page),
                })
            }
            .boxed()
        }
    }

    fn branch_claims() -> Claims {
        Claims {
            role: Role::Branch,
            branch_id: Some("4".into()),
            subject: None,
            name: None,
            email: None,
            exp: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn clear_all_keeps_branch_scope_in_a_single_request() {
        let claims = branch_claims();
        let source = Arc::new(RecordingSource::default());
        let mut options = ListOptions { per_page: 10, ..ListOptions::default() };
        claims.scope_filters(&mut options.filters);
        let notifier = Notifier::silent();
        let controller = ListController::new(source.clone(), options, notifier.clone());
        apply(&controller, Resource::Orders, &claims, &notifier, BrowseCommand::Filter("status".into(), "pending".into()));
        tokio::task::yield_now().await;
        let before = source.calls.lock().unwrap().len();

        apply(&controller, Resource::Orders, &claims, &notifier, BrowseCommand::ClearAll);
        tokio::task::yield_now().await;

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), before + 1);
        let last = calls.last().unwrap();
        assert_eq!(last.filters.get("branch_id"), Some("4"));
        assert_eq!(last.filters.get("status"), None);
    }

    #[test]
    fn plain_lines_are_search_input() {
        assert_eq!(BrowseCommand::parse("  john "), Ok(BrowseCommand::Search("john".into())));
        assert_eq!(BrowseCommand::parse(""), Ok(BrowseCommand::Search(String::new())));
    }

    #[test]
    fn commands_parse() {
        assert_eq!(BrowseCommand::parse(":page 3"), Ok(BrowseCommand::Page(3)));
        assert_eq!(BrowseCommand::parse(":per-page 50"), Ok(BrowseCommand::PerPage(50)));
        assert_eq!(
            BrowseCommand::parse(":filter status active"),
            Ok(BrowseCommand::Filter("status".into(), "active".into()))
        );
        assert_eq!(BrowseCommand::parse(":clear"), Ok(BrowseCommand::ClearAll));
        assert_eq!(BrowseCommand::parse(":clear from"), Ok(BrowseCommand::Clear("from".into())));
        assert_eq!(BrowseCommand::parse(":q"), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn bad_commands_explain_themselves() {
        assert!(BrowseCommand::parse(":page x").unwrap_err().contains("page number"));
        assert!(BrowseCommand::parse(":dance").is_err());
        assert!(BrowseCommand::parse(":filter").is_err());
    }
}
