/// a byte offset into a [`SynthesizedSource`] body, captured with [`SynthesizedSource::mark`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InsertionPoint(usize);

/// an append-only shader source with deferred insertions
///
/// Patches are recorded against offsets into the body and spliced in once,
/// by [`SynthesizedSource::finish`]. Patches sharing an offset come out in
/// the order they were inserted.
#[derive(Debug, Default)]
pub struct SynthesizedSource {
    body: String,
    patches: Vec<(InsertionPoint, String)>,
}

impl SynthesizedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: impl AsRef<str>) {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
    }

    pub fn mark(&self) -> InsertionPoint {
        InsertionPoint(self.body.len())
    }

    pub fn insert(&mut self, point: InsertionPoint, text: impl Into<String>) {
        self.patches.push((point, text.into()));
    }

    pub fn finish(self) -> String {
        let Self { body, mut patches } = self;
        // stable, so equal offsets keep insertion order
        patches.sort_by_key(|(point, _)| *point);

        let patch_len: usize = patches.iter().map(|(_, text)| text.len()).sum();
        let mut source = String::with_capacity(body.len() + patch_len);

        let mut cursor = 0;
        for (InsertionPoint(offset), text) in patches {
            source.push_str(&body[cursor..offset]);
            source.push_str(&text);
            cursor = offset;
        }
        source.push_str(&body[cursor..]);

        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_patches_returns_body() {
        let mut source = SynthesizedSource::new();
        source.push_line("a");
        source.push_line("b");

        assert_eq!(source.finish(), "a\nb\n");
    }

    #[test]
    fn patches_at_one_point_keep_insertion_order() {
        let mut source = SynthesizedSource::new();
        source.push_line("head");
        let point = source.mark();
        source.push_line("body");

        source.insert(point, "first\n");
        source.insert(point, "second\n");

        assert_eq!(source.finish(), "head\nfirst\nsecond\nbody\n");
    }

    #[test]
    fn patches_at_different_points() {
        let mut source = SynthesizedSource::new();
        let start = source.mark();
        source.push_line("one");
        let middle = source.mark();
        source.push_line("two");
        let end = source.mark();

        source.insert(end, "three\n");
        source.insert(middle, "one and a half\n");
        source.insert(start, "zero\n");

        assert_eq!(source.finish(), "zero\none\none and a half\ntwo\nthree\n");
    }
}
