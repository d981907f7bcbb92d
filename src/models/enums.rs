use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(GradeLevel {
    M1 => "m1",
    M4 => "m4",
});

str_enum!(AdmissionRound {
    General => "general",
    SpecialTalent => "special_talent",
    SpecialProgram => "special_program",
});

str_enum!(AreaType {
    InArea => "in_area",
    OutOfArea => "out_of_area",
});

str_enum!(LivesWith {
    Parents => "parents",
    Father => "father",
    Mother => "mother",
    Guardian => "guardian",
});
