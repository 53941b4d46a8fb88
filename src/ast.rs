//! Components relating to the statements and mnemonics
//! used in representing Hack assembly programs.
//!
//! These components together are used to construct...
//! - [`Stmt`] (a data structure holding one source statement and its line number),
//! - [`StmtKind`] (the three statement forms: address, compute, label),
//! - [`Dest`], [`Comp`], and [`Jump`] (the fixed mnemonic sets of a compute instruction),
//! - and [`PREDEFINED`] (the symbols every program starts with).

/// A single statement of a Hack assembly program.
///
/// ## Examples
///
/// ```text
/// @R0        // address instruction (predefined symbol)
/// D=M        // compute instruction
/// (LOOP)     // label declaration
/// @LOOP      // address instruction (label)
/// 0;JMP      // compute instruction (jump only)
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Stmt {
    /// The statement.
    pub kind: StmtKind,
    /// The 1-based line number this statement came from, counted over the
    /// raw source (blank and comment-only lines included).
    pub line: usize,
}
impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

/// The three forms a statement can take.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum StmtKind {
    /// An address instruction (`@value`), loading a value into the A register.
    Addr(ImmOrSym),
    /// A compute instruction (`dest=comp;jump`), performing an ALU operation.
    Compute(Compute),
    /// A label declaration (`(NAME)`), binding a name to the address of the
    /// next instruction. Labels produce no output word.
    Label(String),
}
impl std::fmt::Display for StmtKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StmtKind::Addr(target)   => write!(f, "@{target}"),
            StmtKind::Compute(instr) => instr.fmt(f),
            StmtKind::Label(name)    => write!(f, "({name})"),
        }
    }
}

/// The operand of an address instruction: either an immediate value
/// or a symbol to be resolved against the symbol table.
///
/// ## Examples
/// ```text
/// @21
///  ~~
/// @counter
///  ~~~~~~~
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ImmOrSym {
    /// A literal address. Literals are reduced into the 15-bit address field
    /// at parse time, so this value is always below 2^15.
    Imm(u16),
    /// A symbolic address: a predefined symbol, a label, or a variable.
    Sym(String),
}
impl std::fmt::Display for ImmOrSym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImmOrSym::Imm(imm) => imm.fmt(f),
            ImmOrSym::Sym(sym) => f.write_str(sym),
        }
    }
}

/// A compute instruction (`dest=comp;jump`).
///
/// Only the computation is structurally mandatory; the destination and jump
/// clauses may each be present or absent independently.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Compute {
    /// The registers receiving the ALU result, if a `dest=` clause is present.
    pub dest: Option<Dest>,
    /// The computation performed by the ALU.
    pub comp: Comp,
    /// The conditional jump taken on the result, if a `;jump` clause is present.
    pub jump: Option<Jump>,
}
impl Compute {
    /// Encodes this instruction into its 16-bit machine word.
    ///
    /// The word is the computation code, followed by the destination bits
    /// (`000` when there is no destination clause), followed by the jump bits
    /// (`000` when there is no jump clause).
    ///
    /// ## Example
    /// ```
    /// use hack_ensemble::ast::{Comp, Compute, Dest};
    ///
    /// let instr = Compute { dest: Some(Dest::D), comp: Comp::A, jump: None };
    /// assert_eq!(instr.encode(), 0b1110110000010000);
    /// ```
    pub fn encode(&self) -> u16 {
        let dest = self.dest.map_or(0, Dest::code);
        let jump = self.jump.map_or(0, Jump::code);
        self.comp.code() << 6 | dest << 3 | jump
    }
}
impl std::fmt::Display for Compute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(dest) = self.dest {
            write!(f, "{dest}=")?;
        }
        self.comp.fmt(f)?;
        if let Some(jump) = self.jump {
            write!(f, ";{jump}")?;
        }
        Ok(())
    }
}

macro_rules! mnemonic_enum {
    ($(#[$meta:meta])* $Name:ident { $($Variant:ident = $mnemonic:literal => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
        pub enum $Name {
            $(
                #[allow(missing_docs)]
                $Variant
            ),+
        }

        impl $Name {
            /// Looks a mnemonic up by its source spelling.
            ///
            /// The spelling must match the table entry exactly; there is no
            /// case folding and no whitespace allowance.
            pub fn from_mnemonic(s: &str) -> Option<Self> {
                match s {
                    $($mnemonic => Some(Self::$Variant),)+
                    _ => None
                }
            }

            /// The binary code this mnemonic assembles to.
            pub fn code(self) -> u16 {
                match self {
                    $(Self::$Variant => $code),+
                }
            }

            /// The source spelling of this mnemonic.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$Variant => $mnemonic),+
                }
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.mnemonic())
            }
        }
    };
}

mnemonic_enum! {
    /// The destination field of a compute instruction.
    ///
    /// Each of the three bits flags one register receiving the ALU result
    /// (`100` = A, `010` = D, `001` = M). The seven mnemonics are the seven
    /// non-zero combinations, and these spellings are the only ones accepted
    /// (`DM` is not an alias for `MD`).
    Dest {
        M   = "M"   => 0b001,
        D   = "D"   => 0b010,
        MD  = "MD"  => 0b011,
        A   = "A"   => 0b100,
        AM  = "AM"  => 0b101,
        AD  = "AD"  => 0b110,
        AMD = "AMD" => 0b111,
    }
}

mnemonic_enum! {
    /// The computation field of a compute instruction.
    ///
    /// Each 10-bit code is the fixed `111` instruction prefix, the `a` bit
    /// selecting whether the second ALU operand reads A or M, and six ALU
    /// control bits. The control bits are fixed by the architecture per
    /// mnemonic and reproduced here bit for bit; they are not derivable from
    /// the mnemonic's arithmetic meaning.
    Comp {
        Zero      = "0"   => 0b1110101010,
        One       = "1"   => 0b1110111111,
        NegOne    = "-1"  => 0b1110111010,
        D         = "D"   => 0b1110001100,
        A         = "A"   => 0b1110110000,
        NotD      = "!D"  => 0b1110001101,
        NotA      = "!A"  => 0b1110110001,
        NegD      = "-D"  => 0b1110001111,
        NegA      = "-A"  => 0b1110110011,
        DPlusOne  = "D+1" => 0b1110011111,
        APlusOne  = "A+1" => 0b1110110111,
        DMinusOne = "D-1" => 0b1110001110,
        AMinusOne = "A-1" => 0b1110110010,
        DPlusA    = "D+A" => 0b1110000010,
        DMinusA   = "D-A" => 0b1110010011,
        AMinusD   = "A-D" => 0b1110000111,
        DAndA     = "D&A" => 0b1110000000,
        DOrA      = "D|A" => 0b1110010101,
        M         = "M"   => 0b1111110000,
        NotM      = "!M"  => 0b1111110001,
        NegM      = "-M"  => 0b1111110011,
        MPlusOne  = "M+1" => 0b1111110111,
        MMinusOne = "M-1" => 0b1111110010,
        DPlusM    = "D+M" => 0b1111000010,
        DMinusM   = "D-M" => 0b1111010011,
        MMinusD   = "M-D" => 0b1111000111,
        DAndM     = "D&M" => 0b1111000000,
        DOrM      = "D|M" => 0b1111010101,
    }
}

mnemonic_enum! {
    /// The jump field of a compute instruction.
    ///
    /// The three bits test the ALU output (`100` = negative, `010` = zero,
    /// `001` = positive); the jump is taken if any set bit's test passes, so
    /// `JMP` (`111`) is unconditional.
    Jump {
        JGT = "JGT" => 0b001,
        JEQ = "JEQ" => 0b010,
        JGE = "JGE" => 0b011,
        JLT = "JLT" => 0b100,
        JNE = "JNE" => 0b101,
        JLE = "JLE" => 0b110,
        JMP = "JMP" => 0b111,
    }
}

/// The symbols every program starts with: the virtual registers `R0`-`R15`,
/// the pointer symbols `SP`, `LCL`, `ARG`, `THIS`, and `THAT` (aliases of the
/// first five registers), and the memory-mapped `SCREEN` and `KBD` devices.
pub const PREDEFINED: &[(&str, u16)] = &[
    ("SP",     0),
    ("LCL",    1),
    ("ARG",    2),
    ("THIS",   3),
    ("THAT",   4),
    ("R0",     0),
    ("R1",     1),
    ("R2",     2),
    ("R3",     3),
    ("R4",     4),
    ("R5",     5),
    ("R6",     6),
    ("R7",     7),
    ("R8",     8),
    ("R9",     9),
    ("R10",   10),
    ("R11",   11),
    ("R12",   12),
    ("R13",   13),
    ("R14",   14),
    ("R15",   15),
    ("SCREEN", 16384),
    ("KBD",    24576),
];
