//! Control-code operands and the enumerations some of them decode to

/// Defines a named operand enumeration with its wire value and display name
macro_rules! operand_enum {
    ($(#[$meta:meta])* $name:ident : $repr:ty { $($variant:ident = $value:literal => $display:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn value(self) -> $repr {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }

            pub fn from_value(value: $repr) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Case-insensitive lookup, `_` and space are interchangeable
            pub fn from_name(name: &str) -> Option<Self> {
                let wanted = normalize_name(name);
                Self::ALL.iter().copied().find(|v| normalize_name(v.name()) == wanted)
            }
        }
    };
}

operand_enum! {
    /// Text colour selected by the Color code
    Color: u8 {
        White = 0x40 => "White",
        Red = 0x41 => "Red",
        Green = 0x42 => "Green",
        Blue = 0x43 => "Blue",
        LightBlue = 0x44 => "Light Blue",
        Pink = 0x45 => "Pink",
        Yellow = 0x46 => "Yellow",
        Black = 0x47 => "Black",
    }
}

operand_enum! {
    /// Sound effect played by the Sound code
    SoundType: u16 {
        ItemFanfare = 0x0858 => "Item Fanfare",
        Moo = 0x28DF => "Moo",
        FrogRibbit1 = 0x28E3 => "Frog Ribbit 1",
        FrogRibbit2 = 0x28E4 => "Frog Ribbit 2",
        DekuSqueak = 0x3880 => "Deku Squeak",
        DekuCry = 0x3882 => "Deku Cry",
        GenericEvent = 0x38EC => "Generic Event",
        PoeVanishing = 0x4807 => "Poe Vanishing",
        Twinrova1 = 0x486F => "Twinrova 1",
        Twinrova2 = 0x5965 => "Twinrova 2",
        NaviHello = 0x6844 => "Navi Hello",
        TalonEhh = 0x6852 => "Talon Ehh",
        CarpenterWaaaa = 0x6855 => "Carpenter Waaaa",
        NaviHey = 0x685F => "Navi Hey",
        SariaGiggle = 0x6863 => "Saria Giggle",
        Unused1 = 0x6864 => "Unused 1",
        Yaaaa = 0x6867 => "Yaaaa",
        ZeldaHeh = 0x6869 => "Zelda Heh",
        ZeldaAwww = 0x686B => "Zelda Awww",
        ZeldaHuh = 0x686C => "Zelda Huh",
        GenericGiggle = 0x686D => "Generic Giggle",
    }
}

operand_enum! {
    /// Record shown by the High Score code
    HighScore: u8 {
        Archery = 0x00 => "Archery",
        PoePoints = 0x01 => "Poe Points",
        FishWeight = 0x02 => "Fish Weight",
        HorseRace = 0x03 => "Horse Race",
        Marathon = 0x04 => "Marathon",
        DampeRace = 0x06 => "Dampe Race",
    }
}

/// Lowercase, trimmed, with `_` folded to space
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '_' { ' ' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Operand layout following a control-code byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    /// Raw unsigned byte
    Byte,
    /// Raw big-endian u16
    Short,
    /// Raw big-endian 24-bit value
    Triple,
    Color,
    Sound,
    HighScore,
}

impl Operand {
    /// Operand width in bytes
    pub fn width(self) -> usize {
        match self {
            Operand::None => 0,
            Operand::Byte | Operand::Color | Operand::HighScore => 1,
            Operand::Short | Operand::Sound => 2,
            Operand::Triple => 3,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Operand::None => "none",
            Operand::Byte => "u8",
            Operand::Short => "u16",
            Operand::Triple => "u24",
            Operand::Color => "color",
            Operand::Sound => "sound",
            Operand::HighScore => "high score",
        }
    }

    /// Render a decoded operand. Enum values with no name fall back to the
    /// raw integer so they re-encode unchanged.
    pub fn render(self, value: u32) -> String {
        let named = match self {
            Operand::Color => u8::try_from(value).ok().and_then(Color::from_value).map(Color::name),
            Operand::Sound => u16::try_from(value).ok().and_then(SoundType::from_value).map(SoundType::name),
            Operand::HighScore => u8::try_from(value).ok().and_then(HighScore::from_value).map(HighScore::name),
            _ => None,
        };
        named.map_or_else(|| value.to_string(), str::to_string)
    }

    /// Parse operand text into its wire value
    pub fn parse(self, text: &str) -> Result<u32, String> {
        let text = text.trim();
        let named = match self {
            Operand::None => return Err("code takes no operand".to_string()),
            Operand::Color => Color::from_name(text).map(|c| u32::from(c.value())),
            Operand::Sound => SoundType::from_name(text).map(|s| u32::from(s.value())),
            Operand::HighScore => HighScore::from_name(text).map(|h| u32::from(h.value())),
            _ => None,
        };
        if let Some(value) = named {
            return Ok(value);
        }

        let bits = 8 * self.width() as u32;
        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16)
        } else {
            text.parse::<i64>()
        }
        .map_err(|_| format!("'{text}' is not a {} value", self.describe()))?;

        let max = (1i64 << bits) - 1;
        let min = -(1i64 << (bits - 1));
        if parsed > max || parsed < min {
            return Err(format!("{parsed} does not fit in {} byte(s)", self.width()));
        }
        Ok((parsed & max) as u32)
    }

    /// Big-endian operand bytes
    pub fn to_bytes(self, value: u32) -> Vec<u8> {
        let width = self.width();
        value.to_be_bytes()[4 - width..].to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> u32 {
        bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    }
}
