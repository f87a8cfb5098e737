//! Instruction formatter for traces and the debugger.
//!
//! Execution never goes through this table; the executor only consumes
//! [`crate::opcodes`]. Operand conventions match the executor: for
//! CBNE/DBNZ/BBS/BBC the first operand byte is the direct-page offset and
//! the second the signed displacement, and for the dp,dp / dp,#imm forms
//! the source (or immediate) byte comes first.

use crate::opcodes;

/// Operand encoding attached to a mnemonic.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Operands {
    None,
    Imm,
    Dp,
    DpX,
    DpY,
    DpImm,
    DpDp,
    IndX,
    IndY,
    Abs,
    AbsX,
    AbsY,
    AbsIndX,
    AbsBit,
    Rel,
    DpRel,
    DpXRel,
    DpBit,
    DpBitRel,
    Up,
}

use Operands::*;

/// Mnemonic prefix (including any fixed register operands) and operand
/// encoding, indexed by opcode byte.
#[rustfmt::skip]
static TABLE: [(&str, Operands); 256] = [
    // 0x00
    ("NOP", None), ("TCALL 0", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("OR A,", Dp), ("OR A,", Abs), ("OR A,(X)", None), ("OR A,", IndX),
    ("OR A,", Imm), ("OR ", DpDp), ("OR1 C,", AbsBit), ("ASL ", Dp),
    ("ASL ", Abs), ("PUSH PSW", None), ("TSET1 ", Abs), ("BRK", None),
    // 0x10
    ("BPL ", Rel), ("TCALL 1", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("OR A,", DpX), ("OR A,", AbsX), ("OR A,", AbsY), ("OR A,", IndY),
    ("OR ", DpImm), ("OR (X),(Y)", None), ("DECW ", Dp), ("ASL ", DpX),
    ("ASL A", None), ("DEC X", None), ("CMP X,", Abs), ("JMP ", AbsIndX),
    // 0x20
    ("CLRP", None), ("TCALL 2", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("AND A,", Dp), ("AND A,", Abs), ("AND A,(X)", None), ("AND A,", IndX),
    ("AND A,", Imm), ("AND ", DpDp), ("OR1 C,/", AbsBit), ("ROL ", Dp),
    ("ROL ", Abs), ("PUSH A", None), ("CBNE ", DpRel), ("BRA ", Rel),
    // 0x30
    ("BMI ", Rel), ("TCALL 3", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("AND A,", DpX), ("AND A,", AbsX), ("AND A,", AbsY), ("AND A,", IndY),
    ("AND ", DpImm), ("AND (X),(Y)", None), ("INCW ", Dp), ("ROL ", DpX),
    ("ROL A", None), ("INC X", None), ("CMP X,", Dp), ("CALL ", Abs),
    // 0x40
    ("SETP", None), ("TCALL 4", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("EOR A,", Dp), ("EOR A,", Abs), ("EOR A,(X)", None), ("EOR A,", IndX),
    ("EOR A,", Imm), ("EOR ", DpDp), ("AND1 C,", AbsBit), ("LSR ", Dp),
    ("LSR ", Abs), ("PUSH X", None), ("TCLR1 ", Abs), ("PCALL ", Up),
    // 0x50
    ("BVC ", Rel), ("TCALL 5", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("EOR A,", DpX), ("EOR A,", AbsX), ("EOR A,", AbsY), ("EOR A,", IndY),
    ("EOR ", DpImm), ("EOR (X),(Y)", None), ("CMPW YA,", Dp), ("LSR ", DpX),
    ("LSR A", None), ("MOV X,A", None), ("CMP Y,", Abs), ("JMP ", Abs),
    // 0x60
    ("CLRC", None), ("TCALL 6", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("CMP A,", Dp), ("CMP A,", Abs), ("CMP A,(X)", None), ("CMP A,", IndX),
    ("CMP A,", Imm), ("CMP ", DpDp), ("AND1 C,/", AbsBit), ("ROR ", Dp),
    ("ROR ", Abs), ("PUSH Y", None), ("DBNZ ", DpRel), ("RET", None),
    // 0x70
    ("BVS ", Rel), ("TCALL 7", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("CMP A,", DpX), ("CMP A,", AbsX), ("CMP A,", AbsY), ("CMP A,", IndY),
    ("CMP ", DpImm), ("CMP (X),(Y)", None), ("ADDW YA,", Dp), ("ROR ", DpX),
    ("ROR A", None), ("MOV A,X", None), ("CMP Y,", Dp), ("RETI", None),
    // 0x80
    ("SETC", None), ("TCALL 8", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("ADC A,", Dp), ("ADC A,", Abs), ("ADC A,(X)", None), ("ADC A,", IndX),
    ("ADC A,", Imm), ("ADC ", DpDp), ("EOR1 C,", AbsBit), ("DEC ", Dp),
    ("DEC ", Abs), ("MOV Y,", Imm), ("POP PSW", None), ("MOV ", DpImm),
    // 0x90
    ("BCC ", Rel), ("TCALL 9", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("ADC A,", DpX), ("ADC A,", AbsX), ("ADC A,", AbsY), ("ADC A,", IndY),
    ("ADC ", DpImm), ("ADC (X),(Y)", None), ("SUBW YA,", Dp), ("DEC ", DpX),
    ("DEC A", None), ("MOV X,SP", None), ("DIV YA,X", None), ("XCN A", None),
    // 0xA0
    ("EI", None), ("TCALL 10", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("SBC A,", Dp), ("SBC A,", Abs), ("SBC A,(X)", None), ("SBC A,", IndX),
    ("SBC A,", Imm), ("SBC ", DpDp), ("MOV1 C,", AbsBit), ("INC ", Dp),
    ("INC ", Abs), ("CMP Y,", Imm), ("POP A", None), ("MOV (X)+,A", None),
    // 0xB0
    ("BCS ", Rel), ("TCALL 11", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("SBC A,", DpX), ("SBC A,", AbsX), ("SBC A,", AbsY), ("SBC A,", IndY),
    ("SBC ", DpImm), ("SBC (X),(Y)", None), ("MOVW YA,", Dp), ("INC ", DpX),
    ("INC A", None), ("MOV SP,X", None), ("DAS A", None), ("MOV A,(X)+", None),
    // 0xC0
    ("DI", None), ("TCALL 12", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("MOV.s ", Dp), ("MOV.s ", Abs), ("MOV (X),A", None), ("MOV.s ", IndX),
    ("CMP X,", Imm), ("MOV.sx ", Abs), ("MOV1 ", AbsBit), ("MOV.sy ", Dp),
    ("MOV.sy ", Abs), ("MOV X,", Imm), ("POP X", None), ("MUL YA", None),
    // 0xD0
    ("BNE ", Rel), ("TCALL 13", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("MOV.s ", DpX), ("MOV.s ", AbsX), ("MOV.s ", AbsY), ("MOV.s ", IndY),
    ("MOV.sx ", Dp), ("MOV.sx ", DpY), ("MOVW.s ", Dp), ("MOV.sy ", DpX),
    ("DEC Y", None), ("MOV A,Y", None), ("CBNE ", DpXRel), ("DAA A", None),
    // 0xE0
    ("CLRV", None), ("TCALL 14", None), ("SET1 ", DpBit), ("BBS ", DpBitRel),
    ("MOV A,", Dp), ("MOV A,", Abs), ("MOV A,(X)", None), ("MOV A,", IndX),
    ("MOV A,", Imm), ("MOV X,", Abs), ("NOT1 ", AbsBit), ("MOV Y,", Dp),
    ("MOV Y,", Abs), ("NOTC", None), ("POP Y", None), ("SLEEP", None),
    // 0xF0
    ("BEQ ", Rel), ("TCALL 15", None), ("CLR1 ", DpBit), ("BBC ", DpBitRel),
    ("MOV A,", DpX), ("MOV A,", AbsX), ("MOV A,", AbsY), ("MOV A,", IndY),
    ("MOV X,", Dp), ("MOV X,", DpY), ("MOV ", DpDp), ("MOV Y,", DpX),
    ("INC Y", None), ("MOV Y,A", None), ("DBNZ Y,", Rel), ("STOP", None),
];

/// Format the instruction starting at `bytes[0]`, assumed to sit at `addr`
/// (used to resolve branch targets). Returns the text and the instruction
/// length. Missing trailing bytes read as zero.
pub fn disassemble(bytes: &[u8], addr: u16) -> (String, u8) {
    let get = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let opcode = get(0);
    let b1 = get(1);
    let b2 = get(2);
    let word = u16::from_le_bytes([b1, b2]);
    let len = opcodes::length(opcode);

    let (prefix, operands) = TABLE[opcode as usize];
    let bit = opcode >> 5;
    let rel_target = |rel: u8| addr.wrapping_add(len as u16).wrapping_add(rel as i8 as i16 as u16);

    let text = match operands {
        None => prefix.to_owned(),
        Imm => format!("{prefix}#${b1:02X}"),
        Dp => render_store(prefix, format!("${b1:02X}")),
        DpX => render_store(prefix, format!("${b1:02X}+X")),
        DpY => render_store(prefix, format!("${b1:02X}+Y")),
        DpImm => format!("{prefix}${b2:02X},#${b1:02X}"),
        DpDp => format!("{prefix}${b2:02X},${b1:02X}"),
        IndX => render_store(prefix, format!("[${b1:02X}+X]")),
        IndY => render_store(prefix, format!("[${b1:02X}]+Y")),
        Abs => render_store(prefix, format!("${word:04X}")),
        AbsX => render_store(prefix, format!("${word:04X}+X")),
        AbsY => render_store(prefix, format!("${word:04X}+Y")),
        AbsIndX => format!("{prefix}[${word:04X}+X]"),
        AbsBit => {
            let target = word & 0x1FFF;
            let b = word >> 13;
            if opcode == 0xCA {
                // MOV1 m.b,C is the one bit move with memory as destination.
                format!("{prefix}${target:04X}.{b},C")
            } else {
                format!("{prefix}${target:04X}.{b}")
            }
        }
        Rel => format!("{prefix}${:04X}", rel_target(b1)),
        DpRel => format!("{prefix}${b1:02X},${:04X}", rel_target(b2)),
        DpXRel => format!("{prefix}${b1:02X}+X,${:04X}", rel_target(b2)),
        DpBit => format!("{prefix}${b1:02X}.{bit}"),
        DpBitRel => format!("{prefix}${b1:02X}.{bit},${:04X}", rel_target(b2)),
        Up => format!("{prefix}$FF{b1:02X}"),
    };

    (text, len)
}

/// Store forms are tabled as `MOV.s` (A source), `MOV.sx`, `MOV.sy` and
/// `MOVW.s` so the memory operand can be printed first: `MOV $10+X,A`.
fn render_store(prefix: &str, operand: String) -> String {
    match prefix {
        "MOV.s " => format!("MOV {operand},A"),
        "MOV.sx " => format!("MOV {operand},X"),
        "MOV.sy " => format!("MOV {operand},Y"),
        "MOVW.s " => format!("MOVW {operand},YA"),
        _ => format!("{prefix}{operand}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_forms() {
        assert_eq!(disassemble(&[0x00], 0x0200).0, "NOP");
        assert_eq!(disassemble(&[0xE8, 0x42], 0x0200).0, "MOV A,#$42");
        assert_eq!(disassemble(&[0x5F, 0x34, 0x12], 0x0200).0, "JMP $1234");
        assert_eq!(disassemble(&[0xC4, 0x10], 0x0200).0, "MOV $10,A");
        assert_eq!(disassemble(&[0xD5, 0x00, 0x20], 0x0200).0, "MOV $2000+X,A");
        assert_eq!(disassemble(&[0xDA, 0x30], 0x0200).0, "MOVW $30,YA");
        assert_eq!(disassemble(&[0x8F, 0xAA, 0x10], 0x0200).0, "MOV $10,#$AA");
    }

    #[test]
    fn branch_targets_are_relative_to_next_instruction() {
        // BRA +5 from 0x0200: next is 0x0202, target 0x0207.
        assert_eq!(disassemble(&[0x2F, 0x05], 0x0200).0, "BRA $0207");
        // Backward branch.
        assert_eq!(disassemble(&[0xF0, 0xFE], 0x0200).0, "BEQ $0200");
    }

    #[test]
    fn dp_byte_first_then_displacement() {
        // BBS0 $10,+5 at 0x2000 lands at 0x2008.
        let (text, len) = disassemble(&[0x03, 0x10, 0x05], 0x2000);
        assert_eq!(text, "BBS $10.0,$2008");
        assert_eq!(len, 3);
        assert_eq!(disassemble(&[0x6E, 0x20, 0xFB], 0x0300).0, "DBNZ $20,$02FE");
        assert_eq!(disassemble(&[0xDE, 0x20, 0x10], 0x0300).0, "CBNE $20+X,$0313");
    }

    #[test]
    fn bit_operand_forms() {
        assert_eq!(disassemble(&[0xE2, 0x34], 0).0, "SET1 $34.7");
        assert_eq!(disassemble(&[0x0A, 0xFF, 0xBF], 0).0, "OR1 C,$1FFF.5");
        assert_eq!(disassemble(&[0xCA, 0x00, 0x20], 0).0, "MOV1 $0000.1,C");
    }
}
