//! Test namespace shared by the integration tests.

#![allow(dead_code)]

use tessera_core::{Component, ComponentKind, KindInfo, Namespace};

/// Namespace with six plain kinds.
pub struct Parts;

/// Payload of the test namespace.
#[derive(Clone, Debug, PartialEq)]
pub enum Part {
    Alpha(Alpha),
    Beta(Beta),
    Gamma(Gamma),
    Delta(Delta),
    Epsilon(Epsilon),
    Zeta(Zeta),
}

macro_rules! parts {
    ($($ty:ident = $index:expr),* $(,)?) => {
        $(
            #[derive(Clone, Copy, Debug, PartialEq)]
            pub struct $ty(pub u32);

            impl Component for $ty {
                type Namespace = Parts;
                const KIND: ComponentKind = ComponentKind::new($index);

                fn into_data(self) -> Part {
                    Part::$ty(self)
                }

                fn from_data(data: &Part) -> Option<&Self> {
                    match data {
                        Part::$ty(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

parts!(Alpha = 0, Beta = 1, Gamma = 2, Delta = 3, Epsilon = 4, Zeta = 5);

/// Every kind, in index order.
pub const ALL_KINDS: [ComponentKind; 6] = [
    Alpha::KIND,
    Beta::KIND,
    Gamma::KIND,
    Delta::KIND,
    Epsilon::KIND,
    Zeta::KIND,
];

impl Namespace for Parts {
    type Data = Part;
    const NAME: &'static str = "parts";
    const KINDS: &'static [KindInfo] = &[
        KindInfo::new("Alpha"),
        KindInfo::new("Beta"),
        KindInfo::new("Gamma"),
        KindInfo::new("Delta"),
        KindInfo::new("Epsilon"),
        KindInfo::new("Zeta"),
    ];

    fn kind_of(data: &Part) -> ComponentKind {
        match data {
            Part::Alpha(_) => Alpha::KIND,
            Part::Beta(_) => Beta::KIND,
            Part::Gamma(_) => Gamma::KIND,
            Part::Delta(_) => Delta::KIND,
            Part::Epsilon(_) => Epsilon::KIND,
            Part::Zeta(_) => Zeta::KIND,
        }
    }
}

/// Builds the payload of `kind` carrying `value`.
pub fn part(kind: ComponentKind, value: u32) -> Part {
    match kind.index() {
        0 => Part::Alpha(Alpha(value)),
        1 => Part::Beta(Beta(value)),
        2 => Part::Gamma(Gamma(value)),
        3 => Part::Delta(Delta(value)),
        4 => Part::Epsilon(Epsilon(value)),
        _ => Part::Zeta(Zeta(value)),
    }
}
