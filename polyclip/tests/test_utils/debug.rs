use polyclip::geometry::Path64;

/// Helper function to create json string from paths to be used for debugging.
pub fn to_debug_json_str(paths: &[Path64]) -> String {
    format!(
        r#"
[
    {}
]
"#,
        paths
            .iter()
            .map(|p| {
                let pts = p
                    .iter()
                    .map(|pt| format!("[{}, {}]", pt.x, pt.y))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", pts)
            })
            .collect::<Vec<_>>()
            .join(",\n    ")
    )
}
