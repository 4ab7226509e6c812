//! Property-based tests for target path resolution.
//!
//! These tests use proptest to generate target URLs and verify that the
//! resolver's invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::error::Error;
    use crate::path::resolve;
    use proptest::prelude::*;

    const ISSUER: &str = "https://example.com";
    const PREFIX: &str = "/blog";
    const ROOT: &str = "/svn/repo/blog";

    /// The path the resolver should split: prefix substituted, fragment cut.
    fn substituted(location: &str) -> String {
        let path = location.replacen(PREFIX, ROOT, 1);
        match path.find('#') {
            Some(i) => path[..i].to_string(),
            None => path,
        }
    }

    proptest! {
        /// Property: parent + name reconstructs the substituted path exactly
        #[test]
        fn resolve_reconstructs_path(
            dirs in prop::collection::vec("[a-z0-9]{1,8}", 0..4),
            leaf in "[a-z0-9._-]{1,12}".prop_filter("dot segment", |l| l != "." && l != ".."),
            trailing_slash in any::<bool>(),
            fragment in prop::option::of("[a-z]{0,6}"),
        ) {
            let mut location = PREFIX.to_string();
            for dir in &dirs {
                location.push('/');
                location.push_str(dir);
            }
            location.push('/');
            location.push_str(&leaf);
            if trailing_slash {
                location.push('/');
            }
            if let Some(fragment) = &fragment {
                location.push('#');
                location.push_str(fragment);
            }

            let target = resolve(&format!("{}{}", ISSUER, location), ISSUER, PREFIX, ROOT)
                .unwrap();
            prop_assert_eq!(target.full_path(), substituted(&location));
            prop_assert!(!target.parent.ends_with('/'));
            prop_assert!(target.name.starts_with('/'));
            prop_assert_eq!(target.leaf(), leaf.as_str());
            prop_assert_eq!(target.is_directory(), trailing_slash);
        }

        /// Property: whenever resolution succeeds on arbitrary input, the
        /// parts are well formed and reconstruct the path
        #[test]
        fn resolve_parts_well_formed(location in "[/a-z#.]{0,24}") {
            if let Ok(target) = resolve(&format!("{}{}", ISSUER, location), ISSUER, PREFIX, ROOT) {
                prop_assert_eq!(target.full_path(), substituted(&location));
                prop_assert!(!target.parent.is_empty());
                prop_assert!(!target.parent.ends_with('/'));
                prop_assert!(!target.leaf().is_empty());
                prop_assert!(target.leaf() != "." && target.leaf() != "..");
            }
        }

        /// Property: the issuer root never names a document
        #[test]
        fn resolve_rejects_issuer_root(
            slash in any::<bool>(),
            fragment in prop::option::of("[a-z]{0,6}"),
        ) {
            let mut target = ISSUER.to_string();
            if slash {
                target.push('/');
            }
            if let Some(fragment) = fragment {
                target.push('#');
                target.push_str(&fragment);
            }
            let result = resolve(&target, ISSUER, PREFIX, ROOT);
            prop_assert!(matches!(result, Err(Error::InvalidTarget { .. })), "{:?}", result);
        }

        /// Property: targets on another origin are always rejected
        #[test]
        fn resolve_rejects_foreign_origin(host in "[a-z]{1,10}\\.org", path in "(/[a-z]{1,6}){1,3}") {
            let result = resolve(&format!("https://{}{}", host, path), ISSUER, PREFIX, ROOT);
            prop_assert!(matches!(result, Err(Error::InvalidTarget { .. })), "{:?}", result);
        }

        /// Property: a `.` or `..` segment anywhere in the path is rejected
        #[test]
        fn resolve_rejects_dot_segments(
            before in prop::collection::vec("[a-z0-9]{1,8}", 0..3),
            dots in prop::sample::select(vec![".", ".."]),
            after in prop::collection::vec("[a-z0-9]{1,8}", 0..3),
            trailing_slash in any::<bool>(),
        ) {
            let mut segments = before.clone();
            segments.push(dots.to_string());
            segments.extend(after.iter().cloned());
            let mut location = format!("{}/{}", PREFIX, segments.join("/"));
            if trailing_slash {
                location.push('/');
            }
            let result = resolve(&format!("{}{}", ISSUER, location), ISSUER, PREFIX, ROOT);
            prop_assert!(matches!(result, Err(Error::InvalidTarget { .. })), "{:?}", result);
        }

        /// Property: an issuer followed by more host characters is another origin
        #[test]
        fn resolve_rejects_issuer_host_extension(suffix in "[a-z.-]{1,10}", path in "(/[a-z]{1,6}){1,3}") {
            let result = resolve(&format!("{}{}{}", ISSUER, suffix, path), ISSUER, PREFIX, ROOT);
            prop_assert!(matches!(result, Err(Error::InvalidTarget { .. })), "{:?}", result);
        }
    }
}
