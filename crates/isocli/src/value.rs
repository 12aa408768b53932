use std::path::PathBuf;

/// A value with a canonical single-token string form.
///
/// `from_arg(&v.to_arg())` must give back a value equal to `v`.
pub trait ArgValue: Clone + 'static {
    /// Name shown in usage lines and templates.
    const TYPE_NAME: &'static str;

    fn from_arg(raw: &str) -> Option<Self>;
    fn to_arg(&self) -> String;
}

macro_rules! from_str_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl ArgValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_arg(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }

                fn to_arg(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

from_str_value! {
    String => "String",
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
}

impl ArgValue for PathBuf {
    const TYPE_NAME: &'static str = "Path";

    fn from_arg(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| PathBuf::from(raw))
    }

    fn to_arg(&self) -> String {
        self.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_reject_garbage() {
        assert_eq!(i32::from_arg("1815"), Some(1815));
        assert_eq!(i32::from_arg("abc"), None);
        assert_eq!(u8::from_arg("-1"), None);
    }

    #[test]
    fn string_form_is_canonical() {
        assert_eq!(f64::from_arg(&1.5f64.to_arg()), Some(1.5));
        assert_eq!(bool::from_arg(&true.to_arg()), Some(true));
        assert_eq!(String::from_arg("--name"), Some("--name".to_string()));
    }

    #[test]
    fn empty_path_is_not_a_path() {
        assert_eq!(PathBuf::from_arg(""), None);
        assert_eq!(
            PathBuf::from_arg("out/file.txt").map(|p| p.to_arg()),
            Some("out/file.txt".to_string())
        );
    }
}
