//! Partial isomorphisms: reversible conversions that may fail either way.
//!
//! A `PartialIso<A, B>` pairs `apply: A -> B` with `unapply: &B -> A`. Both
//! sides are partial. The law every iso in this crate keeps: whenever
//! `apply(a)` yields `b`, `unapply(&b)` succeeds and re-applying its result
//! yields a value equal to `b`.

use std::rc::Rc;

use crate::error::{IsoError, IsoResult};
use crate::value::ArgValue;

type ApplyFn<A, B> = dyn Fn(A) -> IsoResult<B>;
type UnapplyFn<A, B> = dyn Fn(&B) -> IsoResult<A>;

pub struct PartialIso<A, B> {
    apply: Rc<ApplyFn<A, B>>,
    unapply: Rc<UnapplyFn<A, B>>,
}

impl<A, B> Clone for PartialIso<A, B> {
    fn clone(&self) -> Self {
        Self {
            apply: Rc::clone(&self.apply),
            unapply: Rc::clone(&self.unapply),
        }
    }
}

impl<A: 'static, B: 'static> PartialIso<A, B> {
    pub fn new(
        apply: impl Fn(A) -> IsoResult<B> + 'static,
        unapply: impl Fn(&B) -> IsoResult<A> + 'static,
    ) -> Self {
        Self {
            apply: Rc::new(apply),
            unapply: Rc::new(unapply),
        }
    }

    pub fn apply(&self, a: A) -> IsoResult<B> {
        (self.apply)(a)
    }

    pub fn unapply(&self, b: &B) -> IsoResult<A> {
        (self.unapply)(b)
    }

    /// Iso for one case of a sum type.
    ///
    /// `deconstruct` must return `None` for every value not built by
    /// `construct`. Alternation relies on that to pick the right printer.
    pub fn variant(
        construct: impl Fn(A) -> B + 'static,
        deconstruct: impl Fn(&B) -> Option<A> + 'static,
    ) -> Self {
        Self::new(
            move |a| Ok(construct(a)),
            move |b| deconstruct(b).ok_or(IsoError::Rejected),
        )
    }

    /// Sequential composition: `self` first, then `next`.
    pub fn then<C: 'static>(self, next: PartialIso<B, C>) -> PartialIso<A, C> {
        let (f, g) = (self.clone(), next.clone());
        PartialIso::new(
            move |a| next.apply(self.apply(a)?),
            move |c| f.unapply(&g.unapply(c)?),
        )
    }
}

impl<A: Clone + 'static, B: 'static> PartialIso<A, B> {
    /// Try `self`; if it fails in a given direction, try `other`.
    pub fn or(self, other: Self) -> Self {
        let (f, g) = (self.clone(), other.clone());
        Self::new(
            move |a: A| self.apply(a.clone()).or_else(|_| other.apply(a)),
            move |b| f.unapply(b).or_else(|_| g.unapply(b)),
        )
    }

    /// The same iso read backwards.
    pub fn inverse(self) -> PartialIso<B, A> {
        let f = self.clone();
        PartialIso::new(move |b: B| f.unapply(&b), move |a: &A| self.apply(a.clone()))
    }
}

impl<A: Clone + 'static> PartialIso<A, A> {
    pub fn identity() -> Self {
        Self::new(Ok, |a| Ok(a.clone()))
    }
}

impl<A: ArgValue> PartialIso<String, A> {
    /// Conversion through the value's canonical string form.
    pub fn lossless() -> Self {
        Self::new(
            |raw: String| A::from_arg(&raw).ok_or_else(|| IsoError::conversion(raw, A::TYPE_NAME)),
            |a| Ok(a.to_arg()),
        )
    }
}

impl<B: 'static> PartialIso<Vec<String>, Vec<B>> {
    /// Element-wise lift. A single element that fails fails the whole list.
    pub fn array(element: PartialIso<String, B>) -> Self {
        let inner = element.clone();
        Self::new(
            move |raw: Vec<String>| raw.into_iter().map(|s| element.apply(s)).collect(),
            move |values| values.iter().map(|v| inner.unapply(v)).collect(),
        )
    }
}

/// Left-nested pairs as produced by chaining products: `((A, B), C)`.
///
/// `Flat` is the flat tuple of the same arity; `flatten` and `nest` are
/// inverse and lossless. The flat form is a parameter because a left-nested
/// tuple of one arity is also a pair, so the impls are told apart by their
/// target.
pub trait Nested<Flat>: Sized {
    fn flatten(self) -> Flat;
    fn nest(flat: Flat) -> Self;
}

macro_rules! nested_tuple {
    ($($t:ident),+ => $nested:tt) => {
        #[allow(non_snake_case)]
        impl<$($t),+> Nested<($($t),+)> for $nested {
            fn flatten(self) -> ($($t),+) {
                let $nested = self;
                ($($t),+)
            }

            fn nest(flat: ($($t),+)) -> Self {
                let ($($t),+) = flat;
                $nested
            }
        }
    };
}

nested_tuple!(A, B => (A, B));
nested_tuple!(A, B, C => ((A, B), C));
nested_tuple!(A, B, C, D => (((A, B), C), D));
nested_tuple!(A, B, C, D, E => ((((A, B), C), D), E));
nested_tuple!(A, B, C, D, E, F => (((((A, B), C), D), E), F));
nested_tuple!(A, B, C, D, E, F, G => ((((((A, B), C), D), E), F), G));
nested_tuple!(A, B, C, D, E, F, G, H => (((((((A, B), C), D), E), F), G), H));
nested_tuple!(A, B, C, D, E, F, G, H, I => ((((((((A, B), C), D), E), F), G), H), I));
nested_tuple!(A, B, C, D, E, F, G, H, I, J => (((((((((A, B), C), D), E), F), G), H), I), J));

/// Structural iso from left-nested pairs to the flat tuple of the same arity.
pub fn parenthesize<N, F>() -> PartialIso<N, F>
where
    N: Nested<F> + 'static,
    F: Clone + 'static,
{
    PartialIso::new(|nested: N| Ok(nested.flatten()), |flat: &F| Ok(N::nest(flat.clone())))
}

/// Builds a [`PartialIso`] for one enum variant.
///
/// Fields are taken from the left-nested tuple a chain of `.and(..)`
/// produces, in declaration order:
///
/// ```
/// use isocli::{PartialIso, variant};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Cmd {
///     Hello { name: String, verbose: bool },
///     Print(bool),
///     Quit,
/// }
///
/// let hello: PartialIso<(String, bool), Cmd> = variant!(Cmd::Hello { name, verbose });
/// let print: PartialIso<bool, Cmd> = variant!(Cmd::Print(verbose));
/// let quit: PartialIso<(), Cmd> = variant!(Cmd::Quit);
///
/// assert_eq!(hello.apply(("Ada".into(), true)), Ok(Cmd::Hello { name: "Ada".into(), verbose: true }));
/// assert!(hello.unapply(&Cmd::Quit).is_err());
/// assert_eq!(print.unapply(&Cmd::Print(false)), Ok(false));
/// assert_eq!(quit.unapply(&Cmd::Quit), Ok(()));
/// ```
#[macro_export]
macro_rules! variant {
    (@nest [$acc:tt]) => { $acc };
    (@nest [$acc:tt] $next:ident $($rest:ident)*) => {
        $crate::variant!(@nest [($acc, $next)] $($rest)*)
    };
    ($($path:ident)::+ { $first:ident $(, $rest:ident)* $(,)? }) => {
        $crate::PartialIso::variant(
            |$crate::variant!(@nest [$first] $($rest)*)| $($path)::+ { $first $(, $rest)* },
            |value| match value {
                $($path)::+ { $first $(, $rest)* } => {
                    let $first = ::core::clone::Clone::clone($first);
                    $(let $rest = ::core::clone::Clone::clone($rest);)*
                    ::core::option::Option::Some($crate::variant!(@nest [$first] $($rest)*))
                }
                #[allow(unreachable_patterns)]
                _ => ::core::option::Option::None,
            },
        )
    };
    ($($path:ident)::+ ( $first:ident $(, $rest:ident)* $(,)? )) => {
        $crate::PartialIso::variant(
            |$crate::variant!(@nest [$first] $($rest)*)| $($path)::+ ( $first $(, $rest)* ),
            |value| match value {
                $($path)::+ ( $first $(, $rest)* ) => {
                    let $first = ::core::clone::Clone::clone($first);
                    $(let $rest = ::core::clone::Clone::clone($rest);)*
                    ::core::option::Option::Some($crate::variant!(@nest [$first] $($rest)*))
                }
                #[allow(unreachable_patterns)]
                _ => ::core::option::Option::None,
            },
        )
    };
    ($($path:ident)::+) => {
        $crate::PartialIso::variant(
            |()| $($path)::+,
            |value| match value {
                $($path)::+ => ::core::option::Option::Some(()),
                #[allow(unreachable_patterns)]
                _ => ::core::option::Option::None,
            },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Circle { radius: u32 },
        Rect { width: u32, height: u32, label: String },
        Point,
    }

    #[test]
    fn lossless_rejects_unparseable_input() {
        let iso = PartialIso::<String, i32>::lossless();
        assert_eq!(iso.apply("42".to_string()), Ok(42));
        assert_eq!(
            iso.apply("abc".to_string()),
            Err(IsoError::conversion("abc", "i32"))
        );
        assert_eq!(iso.unapply(&7), Ok("7".to_string()));
    }

    #[test]
    fn then_short_circuits_and_unapplies_in_reverse() {
        let double = PartialIso::new(|n: i32| Ok(n * 2), |n: &i32| Ok(n / 2));
        let iso = PartialIso::<String, i32>::lossless().then(double);
        assert_eq!(iso.apply("21".to_string()), Ok(42));
        assert!(iso.apply("x".to_string()).is_err());
        assert_eq!(iso.unapply(&42), Ok("21".to_string()));
    }

    #[test]
    fn or_falls_through_to_second_iso() {
        let circle: PartialIso<u32, Shape> = variant!(Shape::Circle { radius });
        let point = PartialIso::variant(
            |_: u32| Shape::Point,
            |s: &Shape| matches!(s, Shape::Point).then_some(0),
        );
        let either = circle.or(point);
        assert_eq!(either.unapply(&Shape::Point), Ok(0));
        assert_eq!(either.unapply(&Shape::Circle { radius: 3 }), Ok(3));
        assert!(either.unapply(&Shape::Rect { width: 1, height: 1, label: String::new() }).is_err());
    }

    #[test]
    fn inverse_swaps_directions() {
        let iso = PartialIso::<String, u8>::lossless().inverse();
        assert_eq!(iso.apply(5), Ok("5".to_string()));
        assert_eq!(iso.unapply(&"9".to_string()), Ok(9));
        assert!(iso.unapply(&"300".to_string()).is_err());
    }

    #[test]
    fn identity_is_neutral_for_then() {
        let iso = PartialIso::identity().then(PartialIso::<String, u16>::lossless());
        assert_eq!(iso.apply("80".to_string()), Ok(80));
    }

    #[test]
    fn variant_unapply_only_owns_its_case() {
        let rect: PartialIso<((u32, u32), String), Shape> =
            variant!(Shape::Rect { width, height, label });
        let value = rect.apply(((2, 3), "box".to_string())).unwrap();
        assert_eq!(
            value,
            Shape::Rect { width: 2, height: 3, label: "box".to_string() }
        );
        assert_eq!(rect.unapply(&value), Ok(((2, 3), "box".to_string())));
        assert_eq!(rect.unapply(&Shape::Point), Err(IsoError::Rejected));

        let point: PartialIso<(), Shape> = variant!(Shape::Point);
        assert_eq!(point.unapply(&Shape::Circle { radius: 1 }), Err(IsoError::Rejected));
    }

    #[test]
    fn parenthesize_flattens_left_nested_pairs() {
        let iso: PartialIso<_, (u8, char, bool, &str)> =
            parenthesize::<(((u8, char), bool), &'static str), _>();
        let flat = iso.apply((((1, 'a'), true), "x")).unwrap();
        assert_eq!(flat, (1, 'a', true, "x"));
        assert_eq!(iso.unapply(&flat), Ok((((1, 'a'), true), "x")));
    }

    #[test]
    fn array_fails_on_any_bad_element() {
        let iso = PartialIso::array(PartialIso::<String, u32>::lossless());
        assert_eq!(iso.apply(vec!["1".into(), "2".into()]), Ok(vec![1, 2]));
        assert!(iso.apply(vec!["1".into(), "two".into()]).is_err());
        assert_eq!(iso.unapply(&vec![3, 4]), Ok(vec!["3".to_string(), "4".to_string()]));
    }
}
