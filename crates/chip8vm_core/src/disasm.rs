use std::fmt;

use crate::instruction::decode;

/// Text for a single opcode. Words that do not decode are shown as data.
pub fn disassemble(opcode: u16) -> String {
    match decode(opcode) {
        Ok(instruction) => instruction.to_string(),
        Err(_) => format!("DW ${opcode:04X}"),
    }
}

/// One line of a program listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    pub opcode: u16,
    pub text: String,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}: {:04X}  {}", self.address, self.opcode, self.text)
    }
}

/// Walk `program` two bytes at a time as if loaded at `origin`.
///
/// All-zero words are treated as padding and left out; a trailing odd byte
/// is ignored.
pub fn disassemble_program(program: &[u8], origin: u16) -> Vec<Line> {
    program
        .chunks_exact(2)
        .enumerate()
        .filter_map(|(i, word)| {
            let opcode = u16::from_be_bytes([word[0], word[1]]);
            (opcode != 0).then(|| Line {
                address: origin.wrapping_add((i * 2) as u16),
                opcode,
                text: disassemble(opcode),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_words_become_data() {
        assert_eq!(disassemble(0xF0FF), "DW $F0FF");
        assert_eq!(disassemble(0x8AB9), "DW $8AB9");
        assert_eq!(disassemble(0x00EE), "RET");
    }

    #[test]
    fn listing_skips_padding_and_tracks_addresses() {
        let program = [0x00, 0xE0, 0x00, 0x00, 0xA2, 0x2A, 0x60, 0x0C, 0xFF];
        let lines = disassemble_program(&program, 0x200);
        let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "200: 00E0  CLS".to_string(),
                "204: A22A  LD I, $22A".to_string(),
                "206: 600C  LD V0, $0C".to_string(),
            ]
        );
    }
}
