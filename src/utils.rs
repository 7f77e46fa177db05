// utils.rs
// Small helpers shared by the registry and the dose-table parsers

/// Fold a user-typed label into a lookup key: trimmed, lowercase, Portuguese
/// accents stripped. "Lidocaína" and " LIDOCAINA " both map to "lidocaina".
pub fn normalize_key(label: &str) -> String {
    label
        .trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Evenly spaced grid points filling `region` (x range, y range) with `n`
/// points, row-major from the top-left. Used for the fixed stage layouts.
pub fn grid_positions(n: usize, region: ([f32; 2], [f32; 2])) -> Vec<[f32; 2]> {
    if n == 0 {
        return Vec::new();
    }
    let ([x0, x1], [y0, y1]) = region;
    let cols = (n as f32).sqrt().ceil() as usize;
    let rows = (n + cols - 1) / cols;
    let dx = (x1 - x0) / cols as f32;
    let dy = (y1 - y0) / rows as f32;

    (0..n)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            [x0 + dx * (col as f32 + 0.5), y1 - dy * (row as f32 + 0.5)]
        })
        .collect()
}
