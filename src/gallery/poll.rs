/// Photo polling state
///
/// The album is polled on a fixed interval. Only the photo count is
/// compared between polls: the sheet is append-only, so a different count
/// is treated as the only possible change.
use super::model::Photo;

/// What a poll result means for the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Same non-zero count as last time, nothing to redraw
    Unchanged,
    /// The album is empty, show the invitation placeholder
    Empty,
    /// The grid was rebuilt from the new listing
    Rebuilt,
}

#[derive(Debug, Default)]
pub struct PhotoFeed {
    /// Newest first
    photos: Vec<Photo>,
    last_count: usize,
    polls: u64,
}

impl PhotoFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Photos for display, newest first
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }

    /// Number of listings applied so far
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Apply a listing in server order (oldest first)
    pub fn apply(&mut self, mut listing: Vec<Photo>) -> PollOutcome {
        self.polls += 1;
        let count = listing.len();

        if count == self.last_count && self.last_count != 0 {
            return PollOutcome::Unchanged;
        }

        self.last_count = count;
        if count == 0 {
            self.photos.clear();
            return PollOutcome::Empty;
        }

        listing.reverse();
        self.photos = listing;
        PollOutcome::Rebuilt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(n: usize) -> Vec<Photo> {
        (0..n).map(|i| Photo::new(format!("https://h/upload/{}.jpg", i))).collect()
    }

    #[test]
    fn test_same_count_twice_does_not_rebuild() {
        let mut feed = PhotoFeed::new();
        assert_eq!(feed.apply(listing(3)), PollOutcome::Rebuilt);
        assert_eq!(feed.apply(listing(3)), PollOutcome::Unchanged);
        assert_eq!(feed.polls(), 2);
        assert_eq!(feed.last_count(), 3);
    }

    #[test]
    fn test_rebuild_orders_newest_first() {
        let mut feed = PhotoFeed::new();
        feed.apply(listing(2));
        assert_eq!(feed.apply(listing(4)), PollOutcome::Rebuilt);

        let urls: Vec<_> = feed.photos().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://h/upload/3.jpg",
                "https://h/upload/2.jpg",
                "https://h/upload/1.jpg",
                "https://h/upload/0.jpg",
            ]
        );
    }

    #[test]
    fn test_empty_album_keeps_reporting_empty() {
        let mut feed = PhotoFeed::new();
        assert_eq!(feed.apply(Vec::new()), PollOutcome::Empty);
        assert_eq!(feed.apply(Vec::new()), PollOutcome::Empty);
        assert!(feed.photos().is_empty());
    }

    #[test]
    fn test_shrinking_album_rebuilds() {
        let mut feed = PhotoFeed::new();
        feed.apply(listing(3));
        assert_eq!(feed.apply(listing(1)), PollOutcome::Rebuilt);
        assert_eq!(feed.photos().len(), 1);
        assert_eq!(feed.apply(Vec::new()), PollOutcome::Empty);
        assert_eq!(feed.last_count(), 0);
    }
}
