//! Small namespace used by the unit tests.

use crate::ecs::{Component, ComponentKind, KindInfo, Namespace};

pub(crate) const SIZE: ComponentKind = ComponentKind::new(0);
pub(crate) const LABEL: ComponentKind = ComponentKind::new(1);
pub(crate) const SOLID: ComponentKind = ComponentKind::new(2);
pub(crate) const CURSOR: ComponentKind = ComponentKind::new(3);

pub(crate) struct Shapes;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Shape {
    Size(Size),
    Label(Label),
    Solid(Solid),
    Cursor(Cursor),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Size(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Label(pub String);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Solid;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Cursor;

impl Namespace for Shapes {
    type Data = Shape;
    const NAME: &'static str = "shapes";
    const KINDS: &'static [KindInfo] = &[
        KindInfo::new("Size"),
        KindInfo::new("Label"),
        KindInfo::new("Solid"),
        KindInfo::unique("Cursor"),
    ];

    fn kind_of(data: &Shape) -> ComponentKind {
        match data {
            Shape::Size(_) => SIZE,
            Shape::Label(_) => LABEL,
            Shape::Solid(_) => SOLID,
            Shape::Cursor(_) => CURSOR,
        }
    }
}

macro_rules! shape_component {
    ($ty:ident, $kind:expr) => {
        impl Component for $ty {
            type Namespace = Shapes;
            const KIND: ComponentKind = $kind;

            fn into_data(self) -> Shape {
                Shape::$ty(self)
            }

            fn from_data(data: &Shape) -> Option<&Self> {
                match data {
                    Shape::$ty(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

shape_component!(Size, SIZE);
shape_component!(Label, LABEL);
shape_component!(Solid, SOLID);
shape_component!(Cursor, CURSOR);
