/// Macro used for test assertions.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Macro used for implementing path macros. Used for extracting macro repetition count for
/// reserving capacity up front.
#[doc(hidden)]
#[macro_export]
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

/// Construct a path with the points given as a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use polyclip::path64;
/// # use polyclip::geometry::*;
/// let path = path64![(0, 1), (2, 0)];
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[0], Point64::new(0, 1));
/// assert_eq!(path[1], Point64::new(2, 0));
/// ```
#[macro_export]
macro_rules! path64 {
    ($( $x:expr ),* $(,)?) => {
        {
            let size = <[()]>::len(&[$($crate::replace_expr!(($x) ())),*]);
            let mut path: $crate::geometry::Path64 = ::std::vec::Vec::with_capacity(size);
            $(
                path.push($crate::geometry::Point64::new($x.0, $x.1));
            )*
            path
        }
    };
}

/// Construct paths, each given as a bracketed list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use polyclip::paths64;
/// # use polyclip::geometry::*;
/// let paths = paths64![[(0, 0), (10, 0), (10, 10)], [(20, 0), (30, 0), (30, 10)]];
/// assert_eq!(paths.len(), 2);
/// assert_eq!(paths[1][0], Point64::new(20, 0));
/// ```
#[macro_export]
macro_rules! paths64 {
    ($( [$( $x:expr ),* $(,)?] ),* $(,)?) => {
        {
            let paths: $crate::geometry::Paths64 = ::std::vec![$($crate::path64![$($x),*]),*];
            paths
        }
    };
}
