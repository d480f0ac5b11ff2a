use alloc::string::String;
use core::fmt;

// -----------------------------------------------------------------------------
// PropertyPath

/// The location of a value during a traversal, e.g. `Graph.nodes[].name`.
///
/// Segments are borrowed from the caller's stack and only rendered when an
/// error is reported.
#[derive(Clone, Copy)]
pub(crate) struct PropertyPath<'a> {
    segment: Segment<'a>,
    parent: Option<&'a PropertyPath<'a>>,
}

#[derive(Clone, Copy)]
enum Segment<'a> {
    Root(&'a str),
    Member(&'a str),
    Element,
}

impl<'a> PropertyPath<'a> {
    /// The root, named after the declared type.
    #[inline]
    pub const fn root(name: &'a str) -> Self {
        Self {
            segment: Segment::Root(name),
            parent: None,
        }
    }

    /// A member of the value at `self`.
    #[inline]
    pub fn member(&'a self, name: &'a str) -> PropertyPath<'a> {
        PropertyPath {
            segment: Segment::Member(name),
            parent: Some(self),
        }
    }

    /// An element of the array at `self`.
    #[inline]
    pub fn element(&'a self) -> PropertyPath<'a> {
        PropertyPath {
            segment: Segment::Element,
            parent: Some(self),
        }
    }

    /// Renders the path.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        if let Some(parent) = self.parent {
            parent.write(out);
        }
        match self.segment {
            Segment::Root(name) => out.push_str(name),
            Segment::Member(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Element => out.push_str("[]"),
        }
    }
}

impl fmt::Display for PropertyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
