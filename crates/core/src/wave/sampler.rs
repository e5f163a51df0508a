/// Reads a cumulative table at any non-negative index.
///
/// Past the end the table repeats, each full pass adding the final entry once
/// more, so the value keeps growing smoothly instead of jumping back. An empty
/// table yields `decal` unchanged.
pub fn wrap_sum(table: &[i32], index: usize, decal: i64) -> i64 {
    let Some(&last) = table.last() else {
        return decal;
    };

    let len = table.len();
    let cycles = (index / len) as i64;
    let remainder = index % len;
    decal + cycles * i64::from(last) + i64::from(table[remainder])
}

/// Samples an intro table followed by an endlessly repeating main table.
///
/// The main table starts where the intro ends, so the intro's final offset is
/// carried in as the decal.
pub fn sample(index: usize, intro: &[i32], main: &[i32]) -> i64 {
    if index < intro.len() {
        return wrap_sum(intro, index, 0);
    }

    let decal = intro.last().map_or(0, |&last| i64::from(last));
    wrap_sum(main, index - intro.len(), decal)
}
