//! Primitive type names understood by the property grammar.

/// Map a type name written in a property line to the emitted CLR type.
///
/// Matching is case-insensitive. Unknown names pass through unchanged so
/// callers can use their own types (enums, value objects).
pub fn clr_type_from_string(type_str: &str) -> String {
    let mapped = match type_str.to_ascii_lowercase().as_str() {
        "string" => "string",
        "int" => "int",
        "long" => "long",
        "short" => "short",
        "byte" => "byte",
        "bool" => "bool",
        "decimal" => "decimal",
        "float" => "float",
        "double" => "double",
        "char" => "char",
        "datetime" => "DateTime",
        "dateonly" => "DateOnly",
        "timeonly" => "TimeOnly",
        "datetimeoffset" => "DateTimeOffset",
        "timespan" => "TimeSpan",
        "guid" => "Guid",
        _ => return type_str.to_string(),
    };
    mapped.to_string()
}
