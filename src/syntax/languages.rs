//! Language identification and lexical profiles
//!
//! Maps file extensions to language IDs and holds the static keyword, type
//! and builtin tables the tokenizer classifies identifiers against.

use std::path::Path;

use super::highlights::TokenKind;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    C,
    Cpp,
    Rust,
    Glsl,
    Hlsl,
    Lua,
    Sql,
    JavaScript,
}

impl LanguageId {
    pub const ALL: [LanguageId; 9] = [
        LanguageId::PlainText,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Rust,
        LanguageId::Glsl,
        LanguageId::Hlsl,
        LanguageId::Lua,
        LanguageId::Sql,
        LanguageId::JavaScript,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" | "inl" => LanguageId::Cpp,
            "rs" => LanguageId::Rust,
            "glsl" | "vert" | "frag" | "geom" | "comp" | "tesc" | "tese" => LanguageId::Glsl,
            "hlsl" | "fx" | "fxh" | "hlsli" => LanguageId::Hlsl,
            "lua" => LanguageId::Lua,
            "sql" => LanguageId::Sql,
            "js" | "mjs" | "cjs" => LanguageId::JavaScript,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Rust => "Rust",
            LanguageId::Glsl => "GLSL",
            LanguageId::Hlsl => "HLSL",
            LanguageId::Lua => "Lua",
            LanguageId::Sql => "SQL",
            LanguageId::JavaScript => "JavaScript",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }

    /// Lexical tables for this language
    pub fn profile(&self) -> &'static LanguageProfile {
        match self {
            LanguageId::PlainText => &PLAIN_TEXT,
            LanguageId::C => &C,
            LanguageId::Cpp => &CPP,
            LanguageId::Rust => &RUST,
            LanguageId::Glsl => &GLSL,
            LanguageId::Hlsl => &HLSL,
            LanguageId::Lua => &LUA,
            LanguageId::Sql => &SQL,
            LanguageId::JavaScript => &JAVASCRIPT,
        }
    }
}

/// Static lexical description of a language
#[derive(Debug)]
pub struct LanguageProfile {
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub builtins: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    /// Block comment delimiters (start, end)
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Lines whose first non-whitespace character is this are preprocessor lines
    pub preprocessor: Option<char>,
    /// Single-quoted literals are strings rather than character literals
    pub single_quote_strings: bool,
    pub case_sensitive: bool,
}

impl LanguageProfile {
    fn contains(&self, table: &[&str], word: &str) -> bool {
        if self.case_sensitive {
            table.contains(&word)
        } else {
            table.iter().any(|w| w.eq_ignore_ascii_case(word))
        }
    }

    /// Keyword, type or builtin classification of an identifier
    pub fn classify_word(&self, word: &str) -> Option<TokenKind> {
        if self.contains(self.keywords, word) {
            Some(TokenKind::Keyword)
        } else if self.contains(self.types, word) {
            Some(TokenKind::Type)
        } else if self.contains(self.builtins, word) {
            Some(TokenKind::Builtin)
        } else {
            None
        }
    }
}

static PLAIN_TEXT: LanguageProfile = LanguageProfile {
    keywords: &[],
    types: &[],
    builtins: &[],
    line_comment: None,
    block_comment: None,
    preprocessor: None,
    single_quote_strings: false,
    case_sensitive: true,
};

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "const", "continue", "default", "do", "else", "enum", "extern",
    "for", "goto", "if", "inline", "register", "restrict", "return", "sizeof", "static",
    "struct", "switch", "typedef", "union", "volatile", "while",
];

const C_TYPES: &[&str] = &[
    "bool", "char", "double", "float", "int", "long", "short", "signed", "unsigned", "void",
    "size_t", "ptrdiff_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t",
    "uint32_t", "uint64_t", "FILE",
];

const C_BUILTINS: &[&str] = &[
    "printf", "fprintf", "sprintf", "snprintf", "scanf", "malloc", "calloc", "realloc", "free",
    "memcpy", "memmove", "memset", "memcmp", "strlen", "strcpy", "strncpy", "strcmp", "strcat",
    "fopen", "fclose", "fread", "fwrite", "assert", "exit", "NULL",
];

static C: LanguageProfile = LanguageProfile {
    keywords: C_KEYWORDS,
    types: C_TYPES,
    builtins: C_BUILTINS,
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    preprocessor: Some('#'),
    single_quote_strings: false,
    case_sensitive: true,
};

static CPP: LanguageProfile = LanguageProfile {
    keywords: &[
        "alignas", "alignof", "auto", "break", "case", "catch", "class", "const", "consteval",
        "constexpr", "const_cast", "continue", "co_await", "co_return", "co_yield", "decltype",
        "default", "delete", "do", "dynamic_cast", "else", "enum", "explicit", "export",
        "extern", "false", "final", "for", "friend", "goto", "if", "inline", "mutable",
        "namespace", "new", "noexcept", "nullptr", "operator", "override", "private",
        "protected", "public", "reinterpret_cast", "return", "sizeof", "static",
        "static_assert", "static_cast", "struct", "switch", "template", "this", "throw", "true",
        "try", "typedef", "typeid", "typename", "union", "using", "virtual", "volatile", "while",
    ],
    types: &[
        "bool", "char", "char8_t", "char16_t", "char32_t", "double", "float", "int", "long",
        "short", "signed", "unsigned", "void", "wchar_t", "size_t", "int8_t", "int16_t",
        "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "string",
        "vector", "map", "unordered_map", "set", "array", "unique_ptr", "shared_ptr",
        "weak_ptr", "optional", "variant",
    ],
    builtins: &[
        "std", "printf", "malloc", "free", "memcpy", "memset", "strlen", "move", "forward",
        "make_unique", "make_shared", "cout", "cerr", "endl", "assert",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    preprocessor: Some('#'),
    single_quote_strings: false,
    case_sensitive: true,
};

static RUST: LanguageProfile = LanguageProfile {
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while",
    ],
    types: &[
        "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
        "i64", "i128", "isize", "f32", "f64", "String", "Vec", "Option", "Result", "Box", "Rc",
        "Arc", "HashMap", "HashSet", "BTreeMap",
    ],
    builtins: &[
        "println", "print", "eprintln", "eprint", "format", "vec", "panic", "assert",
        "assert_eq", "assert_ne", "debug_assert", "unreachable", "todo", "unimplemented",
        "write", "writeln", "Some", "None", "Ok", "Err",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    preprocessor: None,
    single_quote_strings: false,
    case_sensitive: true,
};

const SHADER_KEYWORDS: &[&str] = &[
    "break", "case", "const", "continue", "default", "discard", "do", "else", "for", "if",
    "in", "inout", "out", "return", "struct", "switch", "uniform", "while",
];

static GLSL: LanguageProfile = LanguageProfile {
    keywords: &[
        "attribute", "break", "buffer", "case", "centroid", "coherent", "const", "continue",
        "default", "discard", "do", "else", "flat", "for", "highp", "if", "in", "inout",
        "invariant", "layout", "lowp", "mediump", "noperspective", "out", "precision",
        "readonly", "restrict", "return", "shared", "smooth", "struct", "subroutine", "switch",
        "uniform", "varying", "volatile", "while", "writeonly",
    ],
    types: &[
        "void", "bool", "int", "uint", "float", "double", "vec2", "vec3", "vec4", "dvec2",
        "dvec3", "dvec4", "bvec2", "bvec3", "bvec4", "ivec2", "ivec3", "ivec4", "uvec2",
        "uvec3", "uvec4", "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4", "mat3x2",
        "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4", "sampler1D", "sampler2D",
        "sampler3D", "samplerCube", "sampler2DShadow", "sampler2DArray", "image2D",
    ],
    builtins: &[
        "abs", "acos", "asin", "atan", "ceil", "clamp", "cos", "cross", "dFdx", "dFdy",
        "degrees", "distance", "dot", "exp", "exp2", "faceforward", "floor", "fract",
        "inversesqrt", "length", "log", "log2", "max", "min", "mix", "mod", "normalize", "pow",
        "radians", "reflect", "refract", "sign", "sin", "smoothstep", "sqrt", "step", "tan",
        "texture", "texelFetch", "textureLod", "transpose", "inverse", "gl_Position",
        "gl_FragCoord", "gl_FragDepth", "gl_VertexID", "gl_InstanceID",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    preprocessor: Some('#'),
    single_quote_strings: false,
    case_sensitive: true,
};

static HLSL: LanguageProfile = LanguageProfile {
    keywords: SHADER_KEYWORDS,
    types: &[
        "void", "bool", "int", "uint", "half", "float", "double", "float2", "float3", "float4",
        "int2", "int3", "int4", "uint2", "uint3", "uint4", "half2", "half3", "half4",
        "float2x2", "float3x3", "float4x4", "float3x4", "float4x3", "matrix", "vector",
        "Texture2D", "Texture3D", "TextureCube", "SamplerState", "SamplerComparisonState",
        "RWTexture2D", "StructuredBuffer", "RWStructuredBuffer", "ByteAddressBuffer",
        "cbuffer", "tbuffer",
    ],
    builtins: &[
        "abs", "acos", "all", "any", "asin", "atan", "atan2", "ceil", "clamp", "cos", "cross",
        "ddx", "ddy", "degrees", "distance", "dot", "exp", "exp2", "floor", "frac", "lerp",
        "length", "log", "log2", "max", "min", "mul", "normalize", "pow", "radians", "reflect",
        "refract", "rsqrt", "saturate", "sign", "sin", "smoothstep", "sqrt", "step", "tan",
        "Sample", "SampleLevel", "Load",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    preprocessor: Some('#'),
    single_quote_strings: false,
    case_sensitive: true,
};

static LUA: LanguageProfile = LanguageProfile {
    keywords: &[
        "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
        "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
    ],
    types: &[],
    builtins: &[
        "assert", "collectgarbage", "dofile", "error", "getmetatable", "ipairs", "load",
        "loadfile", "next", "pairs", "pcall", "print", "rawequal", "rawget", "rawlen", "rawset",
        "require", "select", "setmetatable", "tonumber", "tostring", "type", "xpcall", "string",
        "table", "math", "io", "os", "coroutine", "utf8",
    ],
    line_comment: Some("--"),
    block_comment: Some(("--[[", "]]")),
    preprocessor: None,
    single_quote_strings: true,
    case_sensitive: true,
};

static SQL: LanguageProfile = LanguageProfile {
    keywords: &[
        "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "check", "column",
        "constraint", "create", "database", "default", "delete", "desc", "distinct", "drop",
        "else", "end", "exists", "foreign", "from", "full", "group", "having", "in", "index",
        "inner", "insert", "into", "is", "join", "key", "left", "like", "limit", "not", "null",
        "on", "or", "order", "outer", "primary", "references", "right", "select", "set",
        "table", "then", "union", "unique", "update", "values", "view", "when", "where", "with",
    ],
    types: &[
        "bigint", "binary", "bit", "blob", "boolean", "char", "date", "datetime", "decimal",
        "double", "float", "int", "integer", "numeric", "real", "smallint", "text", "time",
        "timestamp", "tinyint", "varchar",
    ],
    builtins: &[
        "avg", "cast", "coalesce", "count", "lower", "max", "min", "now", "nullif", "round",
        "substring", "sum", "trim", "upper",
    ],
    line_comment: Some("--"),
    block_comment: Some(("/*", "*/")),
    preprocessor: None,
    single_quote_strings: true,
    case_sensitive: false,
};

static JAVASCRIPT: LanguageProfile = LanguageProfile {
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
        "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
        "from", "function", "if", "import", "in", "instanceof", "let", "new", "null", "of",
        "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof",
        "undefined", "var", "void", "while", "with", "yield",
    ],
    types: &[
        "Array", "ArrayBuffer", "BigInt", "Boolean", "Date", "Error", "Function", "Map",
        "Number", "Object", "Promise", "Proxy", "RegExp", "Set", "String", "Symbol", "WeakMap",
        "WeakSet",
    ],
    builtins: &[
        "console", "document", "window", "globalThis", "JSON", "Math", "parseInt",
        "parseFloat", "isNaN", "isFinite", "setTimeout", "setInterval", "clearTimeout",
        "clearInterval", "require", "fetch",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    preprocessor: None,
    single_quote_strings: true,
    case_sensitive: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(LanguageId::from_extension("c"), LanguageId::C);
        assert_eq!(LanguageId::from_extension("HPP"), LanguageId::Cpp);
        assert_eq!(LanguageId::from_extension("rs"), LanguageId::Rust);
        assert_eq!(LanguageId::from_extension("frag"), LanguageId::Glsl);
        assert_eq!(LanguageId::from_extension("hlsl"), LanguageId::Hlsl);
        assert_eq!(LanguageId::from_extension("lua"), LanguageId::Lua);
        assert_eq!(LanguageId::from_extension("sql"), LanguageId::Sql);
        assert_eq!(LanguageId::from_extension("mjs"), LanguageId::JavaScript);
        assert_eq!(LanguageId::from_extension("txt"), LanguageId::PlainText);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            LanguageId::from_path(Path::new("shaders/blur.frag")),
            LanguageId::Glsl
        );
        assert_eq!(
            LanguageId::from_path(Path::new("main.rs")),
            LanguageId::Rust
        );
        assert_eq!(
            LanguageId::from_path(Path::new("no_extension")),
            LanguageId::PlainText
        );
    }

    #[test]
    fn test_classify_word() {
        let rust = LanguageId::Rust.profile();
        assert_eq!(rust.classify_word("fn"), Some(TokenKind::Keyword));
        assert_eq!(rust.classify_word("Vec"), Some(TokenKind::Type));
        assert_eq!(rust.classify_word("println"), Some(TokenKind::Builtin));
        assert_eq!(rust.classify_word("Fn"), None);
    }

    #[test]
    fn test_sql_is_case_insensitive() {
        let sql = LanguageId::Sql.profile();
        assert_eq!(sql.classify_word("SELECT"), Some(TokenKind::Keyword));
        assert_eq!(sql.classify_word("select"), Some(TokenKind::Keyword));
        assert_eq!(sql.classify_word("VarChar"), Some(TokenKind::Type));
    }

    #[test]
    fn test_every_language_has_a_profile() {
        for lang in LanguageId::ALL {
            let profile = lang.profile();
            assert_eq!(lang.has_highlighting(), profile.line_comment.is_some());
        }
    }
}
