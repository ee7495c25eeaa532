//! Fixed-size chunking for commit batches.

/// Lazy iterator over `Vec<T>` chunks of at most `chunk_size` items.
///
/// Created by [`split_lists`]. Consumes its source; once partially
/// drained it cannot be restarted.
#[derive(Debug)]
pub struct SplitLists<I: Iterator> {
    iter: I,
    chunk_size: usize,
    done: bool,
}

/// Split `iterable` into chunks of `chunk_size` elements.
///
/// The last chunk is shorter when the input does not divide evenly, and
/// empty input yields no chunks. A `chunk_size` of zero means "no
/// chunking": the whole input comes back as a single chunk.
pub fn split_lists<I>(iterable: I, chunk_size: usize) -> SplitLists<I::IntoIter>
where
    I: IntoIterator,
{
    SplitLists {
        iter: iterable.into_iter(),
        chunk_size,
        done: false,
    }
}

impl<I: Iterator> Iterator for SplitLists<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let chunk: Vec<I::Item> = if self.chunk_size == 0 {
            self.done = true;
            self.iter.by_ref().collect()
        } else {
            self.iter.by_ref().take(self.chunk_size).collect()
        };

        if chunk.is_empty() {
            self.done = true;
            return None;
        }
        if chunk.len() < self.chunk_size {
            self.done = true;
        }
        Some(chunk)
    }
}
