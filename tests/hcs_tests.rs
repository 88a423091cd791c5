use hcsdiff::hcs::heaviest_common_subsequence;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn test_lcs_fixture() {
    let left = chars("XMJYAUZ");
    let right = chars("MZJAWXU");
    let result = heaviest_common_subsequence(|a, b| a == b, |_| 1, &left, &right);

    let matched: String = result.left_indices().map(|i| left[i]).collect();
    assert_eq!(matched, "MJAU");
    assert_eq!(result.weight, 4);
}

#[test]
fn test_weights_override_length() {
    let left = chars("XMJYAUZ");
    let right = chars("MZJAWXU");
    let weigh = |c: &char| if *c == 'Z' { 10 } else { 1 };
    let result = heaviest_common_subsequence(|a, b| a == b, weigh, &left, &right);

    let matched: String = result.left_indices().map(|i| left[i]).collect();
    assert_eq!(matched, "MZ");
    assert_eq!(result.weight, 11);
}

#[test]
fn test_custom_equality() {
    let left = vec!["Alpha", "beta", "GAMMA"];
    let right = vec!["alpha", "gamma"];
    let result = heaviest_common_subsequence(
        |a: &&str, b: &&str| a.eq_ignore_ascii_case(b),
        |_| 1,
        &left,
        &right,
    );
    assert_eq!(result.pairs, vec![(0, 0), (2, 1)]);
}

#[test]
fn test_no_common_items() {
    let left = chars("abc");
    let right = chars("xyz");
    let result = heaviest_common_subsequence(|a, b| a == b, |_| 1, &left, &right);
    assert!(result.is_empty());
    assert_eq!(result.weight, 0);
}

#[test]
fn test_right_indices_increase() {
    let left = chars("abcbdab");
    let right = chars("bdcaba");
    let result = heaviest_common_subsequence(|a, b| a == b, |_| 1, &left, &right);
    assert_eq!(result.len(), 4);

    let rights: Vec<usize> = result.right_indices().collect();
    assert!(rights.windows(2).all(|w| w[0] < w[1]));
}
