use std::fmt::{self, Display};

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Displays at most the first 497 bytes of a query, cut on a char boundary, followed by `...`.
pub struct TruncateLong<'a>(pub &'a str);

impl Display for TruncateLong<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut end = self.0.len().min(497);
        while !self.0.is_char_boundary(end) {
            end -= 1;
        }
        write!(
            f,
            "{}{}",
            self.0[..end].trim_end(),
            if self.0.len() > 497 { "..." } else { "" },
        )
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::TruncateLong(::std::convert::AsRef::<str>::as_ref(&$query))
    };
}
