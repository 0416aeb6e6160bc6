//! Type descriptor synthesis from driver-reported numeric type codes.

/// Standard SQL type codes, numbered the way JDBC-style drivers report them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Blob,
    Clob,
    Ref,
    DataLink,
    Boolean,
    RowId,
    NChar,
    NVarChar,
    LongNVarChar,
    NClob,
    SqlXml,
    RefCursor,
    TimeWithTimezone,
    TimestampWithTimezone,
}

/// How a type's size information is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    /// `(size)`
    Character,
    /// `(size[,digits])`
    Numeric,
    /// no suffix
    Plain,
}

const CODES: &[(i32, TypeCode)] = &[
    (-7, TypeCode::Bit),
    (-6, TypeCode::TinyInt),
    (5, TypeCode::SmallInt),
    (4, TypeCode::Integer),
    (-5, TypeCode::BigInt),
    (6, TypeCode::Float),
    (7, TypeCode::Real),
    (8, TypeCode::Double),
    (2, TypeCode::Numeric),
    (3, TypeCode::Decimal),
    (1, TypeCode::Char),
    (12, TypeCode::VarChar),
    (-1, TypeCode::LongVarChar),
    (91, TypeCode::Date),
    (92, TypeCode::Time),
    (93, TypeCode::Timestamp),
    (-2, TypeCode::Binary),
    (-3, TypeCode::VarBinary),
    (-4, TypeCode::LongVarBinary),
    (0, TypeCode::Null),
    (1111, TypeCode::Other),
    (2000, TypeCode::JavaObject),
    (2001, TypeCode::Distinct),
    (2002, TypeCode::Struct),
    (2003, TypeCode::Array),
    (2004, TypeCode::Blob),
    (2005, TypeCode::Clob),
    (2006, TypeCode::Ref),
    (70, TypeCode::DataLink),
    (16, TypeCode::Boolean),
    (-8, TypeCode::RowId),
    (-15, TypeCode::NChar),
    (-9, TypeCode::NVarChar),
    (-16, TypeCode::LongNVarChar),
    (2011, TypeCode::NClob),
    (2009, TypeCode::SqlXml),
    (2012, TypeCode::RefCursor),
    (2013, TypeCode::TimeWithTimezone),
    (2014, TypeCode::TimestampWithTimezone),
];

impl TypeCode {
    /// Look up a numeric code; `None` for codes outside the enumeration
    pub fn from_code(code: i32) -> Option<Self> {
        CODES.iter().find(|(c, _)| *c == code).map(|(_, t)| *t)
    }

    pub fn code(self) -> i32 {
        CODES
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(c, _)| *c)
            .unwrap_or(1111)
    }

    /// Generic name used when the driver does not report a literal type name
    pub fn name(self) -> &'static str {
        match self {
            TypeCode::Bit => "BIT",
            TypeCode::TinyInt => "TINYINT",
            TypeCode::SmallInt => "SMALLINT",
            TypeCode::Integer => "INTEGER",
            TypeCode::BigInt => "BIGINT",
            TypeCode::Float => "FLOAT",
            TypeCode::Real => "REAL",
            TypeCode::Double => "DOUBLE",
            TypeCode::Numeric => "NUMERIC",
            TypeCode::Decimal => "DECIMAL",
            TypeCode::Char => "CHAR",
            TypeCode::VarChar => "VARCHAR",
            TypeCode::LongVarChar => "LONGVARCHAR",
            TypeCode::Date => "DATE",
            TypeCode::Time => "TIME",
            TypeCode::Timestamp => "TIMESTAMP",
            TypeCode::Binary => "BINARY",
            TypeCode::VarBinary => "VARBINARY",
            TypeCode::LongVarBinary => "LONGVARBINARY",
            TypeCode::Null => "NULL",
            TypeCode::Other => "OTHER",
            TypeCode::JavaObject => "JAVA_OBJECT",
            TypeCode::Distinct => "DISTINCT",
            TypeCode::Struct => "STRUCT",
            TypeCode::Array => "ARRAY",
            TypeCode::Blob => "BLOB",
            TypeCode::Clob => "CLOB",
            TypeCode::Ref => "REF",
            TypeCode::DataLink => "DATALINK",
            TypeCode::Boolean => "BOOLEAN",
            TypeCode::RowId => "ROWID",
            TypeCode::NChar => "NCHAR",
            TypeCode::NVarChar => "NVARCHAR",
            TypeCode::LongNVarChar => "LONGNVARCHAR",
            TypeCode::NClob => "NCLOB",
            TypeCode::SqlXml => "SQLXML",
            TypeCode::RefCursor => "REF_CURSOR",
            TypeCode::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            TypeCode::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
        }
    }

    pub fn category(self) -> TypeCategory {
        match self {
            TypeCode::Char
            | TypeCode::VarChar
            | TypeCode::LongVarChar
            | TypeCode::NChar
            | TypeCode::NVarChar
            | TypeCode::LongNVarChar => TypeCategory::Character,
            TypeCode::Decimal
            | TypeCode::Double
            | TypeCode::Float
            | TypeCode::Real
            | TypeCode::Numeric => TypeCategory::Numeric,
            _ => TypeCategory::Plain,
        }
    }
}

/// Label used when a type code is unknown and no type name was reported
pub const FALLBACK_TYPE_LABEL: &str = "UNKNOWN";

/// Raw type information for one column as reported by the driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSpec {
    pub code: i32,
    /// Literal type name reported by the driver, if any
    pub type_name: Option<String>,
    pub size: u32,
    pub decimal_digits: u32,
    pub char_octet_length: u32,
}

impl TypeSpec {
    pub fn new(code: TypeCode, size: u32, decimal_digits: u32) -> Self {
        Self {
            code: code.code(),
            type_name: None,
            size,
            decimal_digits,
            char_octet_length: 0,
        }
    }

    pub fn named(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// Result of type synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedType {
    pub descriptor: String,
    /// `None` when the code was not recognized and the label degraded
    pub code: Option<TypeCode>,
}

/// Build the type descriptor string for a column.
///
/// When `zero_size_uses_octets` is set, a decimal type reporting size 0 is
/// formatted with the char-octet-length value instead.
pub fn synthesize_type(spec: &TypeSpec, zero_size_uses_octets: bool) -> SynthesizedType {
    let reported_name = spec
        .type_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let Some(code) = TypeCode::from_code(spec.code) else {
        return SynthesizedType {
            descriptor: reported_name.unwrap_or(FALLBACK_TYPE_LABEL).to_string(),
            code: None,
        };
    };

    let mut descriptor = reported_name.unwrap_or(code.name()).to_string();
    match code.category() {
        TypeCategory::Character => {
            if spec.size > 0 {
                descriptor.push_str(&format!("({})", spec.size));
            }
        }
        TypeCategory::Numeric => {
            let size = if spec.size == 0 && zero_size_uses_octets {
                spec.char_octet_length
            } else {
                spec.size
            };
            if spec.decimal_digits == 0 {
                descriptor.push_str(&format!("({})", size));
            } else {
                descriptor.push_str(&format!("({},{})", size, spec.decimal_digits));
            }
        }
        TypeCategory::Plain => {}
    }

    SynthesizedType {
        descriptor,
        code: Some(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(spec: TypeSpec) -> String {
        synthesize_type(&spec, false).descriptor
    }

    #[test]
    fn test_character_types() {
        assert_eq!(descriptor(TypeSpec::new(TypeCode::VarChar, 80, 0)), "VARCHAR(80)");
        assert_eq!(descriptor(TypeSpec::new(TypeCode::NChar, 3, 0)), "NCHAR(3)");
        assert_eq!(descriptor(TypeSpec::new(TypeCode::VarChar, 0, 0)), "VARCHAR");
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(descriptor(TypeSpec::new(TypeCode::Numeric, 10, 2)), "NUMERIC(10,2)");
        assert_eq!(descriptor(TypeSpec::new(TypeCode::Numeric, 10, 0)), "NUMERIC(10)");
        assert_eq!(descriptor(TypeSpec::new(TypeCode::Double, 53, 0)), "DOUBLE(53)");
    }

    #[test]
    fn test_plain_types_have_no_suffix() {
        assert_eq!(descriptor(TypeSpec::new(TypeCode::Integer, 32, 0)), "INTEGER");
        assert_eq!(descriptor(TypeSpec::new(TypeCode::Date, 10, 0)), "DATE");
    }

    #[test]
    fn test_reported_name_preferred() {
        let spec = TypeSpec::new(TypeCode::VarChar, 255, 0).named("varchar2");
        assert_eq!(descriptor(spec), "varchar2(255)");

        let spec = TypeSpec::new(TypeCode::Integer, 0, 0).named("  ");
        assert_eq!(descriptor(spec), "INTEGER");
    }

    #[test]
    fn test_zero_size_decimal_fallback() {
        let mut spec = TypeSpec::new(TypeCode::Decimal, 0, 2).named("NUMBER");
        spec.char_octet_length = 22;

        assert_eq!(synthesize_type(&spec, true).descriptor, "NUMBER(22,2)");
        assert_eq!(synthesize_type(&spec, false).descriptor, "NUMBER(0,2)");
    }

    #[test]
    fn test_unrecognized_code_degrades() {
        let spec = TypeSpec {
            code: 4242,
            size: 12,
            ..Default::default()
        };
        let result = synthesize_type(&spec, false);
        assert_eq!(result.descriptor, FALLBACK_TYPE_LABEL);
        assert_eq!(result.code, None);

        let named = TypeSpec {
            code: 4242,
            type_name: Some("GEOMETRY".to_string()),
            size: 12,
            ..Default::default()
        };
        assert_eq!(synthesize_type(&named, false).descriptor, "GEOMETRY");
    }

    #[test]
    fn test_code_roundtrip() {
        assert_eq!(TypeCode::from_code(12), Some(TypeCode::VarChar));
        assert_eq!(TypeCode::VarChar.code(), 12);
        assert_eq!(TypeCode::from_code(9999), None);
    }
}
