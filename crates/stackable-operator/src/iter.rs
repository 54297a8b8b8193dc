//! Small iterator helpers shared across the crate.

/// Like [`FromIterator`], but for conversions that can fail.
///
/// This mirrors the standard library's `TryFrom`/`From` split: types that can
/// always be built from an iterator implement [`FromIterator`], while types
/// whose elements need fallible validation (such as [`crate::kvp::KeyValuePairs`])
/// implement this trait instead.
pub trait TryFromIterator<A>: Sized {
    type Error;

    fn try_from_iter<I: IntoIterator<Item = A>>(iter: I) -> Result<Self, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyEven(Vec<i32>);

    impl TryFromIterator<i32> for OnlyEven {
        type Error = i32;

        fn try_from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Result<Self, Self::Error> {
            let mut out = Vec::new();
            for v in iter {
                if v % 2 != 0 {
                    return Err(v);
                }
                out.push(v);
            }
            Ok(Self(out))
        }
    }

    #[test]
    fn collects_when_all_valid() {
        let result = OnlyEven::try_from_iter([2, 4, 6]).unwrap();
        assert_eq!(result.0, vec![2, 4, 6]);
    }

    #[test]
    fn fails_on_first_invalid_element() {
        let err = OnlyEven::try_from_iter([2, 3, 4]).unwrap_err();
        assert_eq!(err, 3);
    }
}
