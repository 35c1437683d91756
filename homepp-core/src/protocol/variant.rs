use std::fmt;

use super::frame::Discriminator;

/// Number base a field token is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Decimal = 10,
    Hex = 16,
}

impl Radix {
    pub fn base(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())
    }
}

/// Where a field sits in the frame and how it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Zero-based position in the full token sequence.
    pub index: usize,
    pub radix: Radix,
}

const fn hex(name: &'static str, index: usize) -> FieldSpec {
    FieldSpec {
        name,
        index,
        radix: Radix::Hex,
    }
}

const fn dec(name: &'static str, index: usize) -> FieldSpec {
    FieldSpec {
        name,
        index,
        radix: Radix::Decimal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMatch {
    Any,
    Exact(i64),
}

impl NumberMatch {
    fn matches(self, number: i64) -> bool {
        match self {
            NumberMatch::Any => true,
            NumberMatch::Exact(n) => n == number,
        }
    }
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub sensor_type: i64,
    pub number: NumberMatch,
    /// Short label used in logs and by the synthetic source.
    pub kind: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Variant {
    pub fn matches(&self, discriminator: Discriminator) -> bool {
        self.sensor_type == discriminator.sensor_type && self.number.matches(discriminator.number)
    }

    /// Smallest frame length that carries every field of this variant.
    pub fn min_tokens(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.index + 1)
            .max()
            .unwrap_or(2)
            .max(2)
    }

    /// Discriminator a source should stamp on readings of this variant.
    pub fn discriminator(&self) -> Discriminator {
        let number = match self.number {
            NumberMatch::Any => 1,
            NumberMatch::Exact(n) => n,
        };
        Discriminator::new(self.sensor_type, number)
    }

    pub fn lookup(discriminator: Discriminator) -> Option<&'static Variant> {
        VARIANTS.iter().find(|v| v.matches(discriminator))
    }
}

pub const TYPE_RESERVED: i64 = 0x0000;
pub const TYPE_CHARGE_CONTROLLER: i64 = 0x0001;
pub const TYPE_MODULE: i64 = 0x0002;
pub const TYPE_LEAK: i64 = 0x0010;
pub const TYPE_MODULE_LEAK: i64 = 0x0011;
pub const TYPE_ENVIRONMENT: i64 = 0x0012;

// Fields sit every 4 tokens up to gas/VOC, then every 2 for the
// particulate block. The tokens in between are not interpreted.
const ENVIRONMENT_MODULE_FIELDS: &[FieldSpec] = &[
    hex("temperature", 5),
    hex("humidity", 9),
    hex("pressure", 13),
    hex("gas", 17),
];

const ENVIRONMENT_FIELDS: &[FieldSpec] = &[
    hex("temperature", 5),
    hex("humidity", 9),
    hex("pressure", 13),
    hex("VOC", 17),
    hex("gas1", 21),
    hex("gas2", 25),
    hex("gas3", 29),
    hex("pm1", 33),
    hex("pm25", 35),
    hex("pm10", 37),
    hex("fire", 39),
    hex("smoke", 41),
];

pub static VARIANTS: &[Variant] = &[
    Variant {
        sensor_type: TYPE_RESERVED,
        number: NumberMatch::Any,
        kind: "reserved",
        fields: &[],
    },
    Variant {
        sensor_type: TYPE_CHARGE_CONTROLLER,
        number: NumberMatch::Any,
        kind: "charge_controller",
        fields: &[dec("charge", 2)],
    },
    Variant {
        sensor_type: TYPE_MODULE,
        number: NumberMatch::Any,
        kind: "module",
        fields: &[hex("temperature_MK", 3)],
    },
    Variant {
        sensor_type: TYPE_LEAK,
        number: NumberMatch::Any,
        kind: "leak",
        fields: &[dec("leak", 5)],
    },
    Variant {
        sensor_type: TYPE_MODULE_LEAK,
        number: NumberMatch::Any,
        kind: "module_leak",
        fields: &[dec("leak", 5)],
    },
    Variant {
        sensor_type: TYPE_ENVIRONMENT,
        number: NumberMatch::Exact(1),
        kind: "module_environment",
        fields: ENVIRONMENT_MODULE_FIELDS,
    },
    Variant {
        sensor_type: TYPE_ENVIRONMENT,
        number: NumberMatch::Exact(2),
        kind: "environment",
        fields: ENVIRONMENT_FIELDS,
    },
];
