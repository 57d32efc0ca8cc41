//! Small helpers shared by the CLI.

use std::collections::HashMap;

use rand::Rng;

/// Clamp `num` into `[min, max]`.
pub fn clamp<T: PartialOrd>(num: T, min: T, max: T) -> T {
    if num < min {
        min
    } else if num > max {
        max
    } else {
        num
    }
}

/// Replace `{key}` placeholders with values from `map`.
///
/// Unknown placeholders are left untouched.
pub fn expand_template<F>(template: &str, map: &HashMap<&str, F>) -> String
where
    F: Fn() -> String,
{
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match map.get(key) {
                    Some(value) => result.push_str(&value()),
                    None => result.push_str(&rest[start..start + end + 2]),
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T>(items: &mut [T]) {
    let mut rng = rand::rng();
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(5, 1, 10), 5);
        assert_eq!(clamp(-3, 1, 10), 1);
        assert_eq!(clamp(42, 1, 10), 10);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn expand_template_replaces_known_keys() {
        let mut map: HashMap<&str, Box<dyn Fn() -> String>> = HashMap::new();
        map.insert("username", Box::new(|| "alice".to_string()));
        map.insert("uuid", Box::new(|| "u1".to_string()));
        assert_eq!(
            expand_template("{username} ({uuid}) {missing}", &map),
            "alice (u1) {missing}"
        );
    }

    #[test]
    fn expand_template_keeps_unclosed_brace() {
        let map: HashMap<&str, fn() -> String> = HashMap::new();
        assert_eq!(expand_template("score: {xp", &map), "score: {xp");
        assert_eq!(expand_template("no placeholders", &map), "no placeholders");
    }

    #[test]
    fn shuffle_preserves_elements() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_handles_tiny_slices() {
        let mut empty: [u8; 0] = [];
        shuffle(&mut empty);
        let mut one = [7];
        shuffle(&mut one);
        assert_eq!(one, [7]);
    }
}
