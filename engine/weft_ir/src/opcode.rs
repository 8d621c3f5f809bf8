//! Opcode catalogue for the tagged-tree wire form.
//!
//! Every node in the wire form is an array whose first element is one of
//! these integer codes. The numbering is part of the wire contract and must
//! not be reused or reordered.

/// Node opcode in the tagged-tree wire form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(i64)]
pub enum Opcode {
    // Literals
    True = 1,
    False = 2,
    Null = 3,
    Int = 4,
    Double = 5,
    String = 6,
    Map = 7,

    // Binary operators
    Add = 8,
    Sub = 9,
    Mul = 10,
    Div = 11,
    Mod = 12,

    // Unary operators
    Negate = 13,

    // Logical
    Or = 14,
    And = 15,
    Not = 16,

    // Comparison
    Equal = 17,
    NotEqual = 18,
    LessThan = 19,
    LessOrEqual = 20,
    GreaterThan = 21,
    GreaterOrEqual = 22,

    // Control and structure
    Ternary = 23,
    If = 24,
    For = 25,
    Statements = 26,
    Var = 27,
    Selector = 28,
    Call = 29,
    Import = 30,
    Macro = 31,
}

impl Opcode {
    /// The integer code carried on the wire.
    #[inline]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Decode an integer code back to an opcode.
    pub fn from_code(code: i64) -> Option<Opcode> {
        Some(match code {
            1 => Opcode::True,
            2 => Opcode::False,
            3 => Opcode::Null,
            4 => Opcode::Int,
            5 => Opcode::Double,
            6 => Opcode::String,
            7 => Opcode::Map,
            8 => Opcode::Add,
            9 => Opcode::Sub,
            10 => Opcode::Mul,
            11 => Opcode::Div,
            12 => Opcode::Mod,
            13 => Opcode::Negate,
            14 => Opcode::Or,
            15 => Opcode::And,
            16 => Opcode::Not,
            17 => Opcode::Equal,
            18 => Opcode::NotEqual,
            19 => Opcode::LessThan,
            20 => Opcode::LessOrEqual,
            21 => Opcode::GreaterThan,
            22 => Opcode::GreaterOrEqual,
            23 => Opcode::Ternary,
            24 => Opcode::If,
            25 => Opcode::For,
            26 => Opcode::Statements,
            27 => Opcode::Var,
            28 => Opcode::Selector,
            29 => Opcode::Call,
            30 => Opcode::Import,
            31 => Opcode::Macro,
            _ => return None,
        })
    }

    /// Wire-catalogue name, used in decode errors.
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::True => "TRUE",
            Opcode::False => "FALSE",
            Opcode::Null => "NULL",
            Opcode::Int => "INT",
            Opcode::Double => "DOUBLE",
            Opcode::String => "STRING",
            Opcode::Map => "MAP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Negate => "NEGATE",
            Opcode::Or => "OR",
            Opcode::And => "AND",
            Opcode::Not => "NOT",
            Opcode::Equal => "EQUAL",
            Opcode::NotEqual => "NOT_EQUAL",
            Opcode::LessThan => "LESS_THAN",
            Opcode::LessOrEqual => "LESS_OR_EQUAL",
            Opcode::GreaterThan => "GREATER_THAN",
            Opcode::GreaterOrEqual => "GREATER_OR_EQUAL",
            Opcode::Ternary => "TERNARY",
            Opcode::If => "IF",
            Opcode::For => "FOR",
            Opcode::Statements => "STATEMENTS",
            Opcode::Var => "VAR",
            Opcode::Selector => "SELECTOR",
            Opcode::Call => "CALL",
            Opcode::Import => "IMPORT",
            Opcode::Macro => "MACRO",
        }
    }
}
