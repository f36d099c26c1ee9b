//! Exclusion pipeline
//!
//! Lazily drops records whose name matches a pattern.

use futures::future;
use futures::stream::{Stream, TryStreamExt};

use crate::domain::Contact;
use crate::store::StorageError;

use super::NameMatcher;

/// Keep only contacts whose name does not match `matcher`.
///
/// Pulls one record at a time from `contacts` and yields it immediately if it
/// survives; order is preserved and nothing is buffered. Errors from the
/// underlying stream are passed through.
pub fn exclude_matching<'a, S>(
    matcher: &'a NameMatcher,
    contacts: S,
) -> impl Stream<Item = Result<Contact, StorageError>> + 'a
where
    S: Stream<Item = Result<Contact, StorageError>> + 'a,
{
    contacts.try_filter(move |contact| future::ready(!matcher.matches(&contact.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PatternCompiler;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready};

    fn contacts(names: &[&str]) -> Vec<Result<Contact, StorageError>> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Ok(Contact::persisted(i as u64 + 1, *name)))
            .collect()
    }

    #[tokio::test]
    async fn test_excludes_matches_and_keeps_order() {
        let matcher = PatternCompiler::default().compile("^J.*").unwrap();
        let source = futures::stream::iter(contacts(&["Jane", "Bob", "Jack", "Alice"]));

        let kept: Vec<Contact> = exclude_matching(&matcher, source).try_collect().await.unwrap();

        assert_eq!(
            kept,
            vec![Contact::persisted(2, "Bob"), Contact::persisted(4, "Alice")]
        );
    }

    #[tokio::test]
    async fn test_everything_excluded() {
        let matcher = PatternCompiler::default().compile(".").unwrap();
        let source = futures::stream::iter(contacts(&["Jane", "Bob"]));

        let kept: Vec<Contact> = exclude_matching(&matcher, source).try_collect().await.unwrap();

        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let matcher = PatternCompiler::default().compile("^J").unwrap();
        let mut items = contacts(&["Bob"]);
        items.push(Err(StorageError::Unavailable("connection reset".to_string())));
        let source = futures::stream::iter(items);

        let result: Result<Vec<Contact>, _> = exclude_matching(&matcher, source).try_collect().await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_pulls_one_record_at_a_time() {
        // An unbounded source: the pipeline must never try to drain it
        let produced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&produced);
        let source = futures::stream::iter(1u64..).map(move |id| {
            counter.fetch_add(1, Ordering::SeqCst);
            let name = if id % 2 == 0 { "Jack" } else { "Bob" };
            Ok(Contact::persisted(id, name))
        });

        let matcher = PatternCompiler::default().compile("^J").unwrap();
        let mut filtered = Box::pin(exclude_matching(&matcher, source));

        let first = filtered.next().await.unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(produced.load(Ordering::SeqCst), 1);

        // Skipping the excluded record 2 costs exactly one extra pull
        let second = filtered.next().await.unwrap().unwrap();
        assert_eq!(second.id, 3);
        assert_eq!(produced.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_waits_for_slow_source_without_lookahead() {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let source = channel_stream(rx);
        let matcher = PatternCompiler::default().compile("^J").unwrap();
        let mut filtered = tokio_test::task::spawn(exclude_matching(&matcher, source));

        assert_pending!(filtered.poll_next());

        tx.send(Ok(Contact::persisted(1, "Jane"))).await.unwrap();
        assert_pending!(filtered.poll_next());

        tx.send(Ok(Contact::persisted(2, "Bob"))).await.unwrap();
        let item = assert_ready!(filtered.poll_next());
        assert_eq!(item.unwrap().unwrap().name, "Bob");

        drop(tx);
        assert!(assert_ready!(filtered.poll_next()).is_none());
    }

    fn channel_stream(
        mut rx: tokio::sync::mpsc::Receiver<Result<Contact, StorageError>>,
    ) -> impl Stream<Item = Result<Contact, StorageError>> {
        async_stream::stream! {
            while let Some(item) = rx.recv().await {
                yield item;
            }
        }
    }
}
