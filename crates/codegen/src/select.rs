//! Instruction selection by best-score-wins (`SPEC_FULL.md` §4.3), grounded
//! on `original_source/src/codegen/code-generator.cpp`'s
//! `ChooseInstructionByOperands`/`GetOperandTypePriority`.

use asm86_types::{
    InstructionVariant, OperandEncoding as OpEn, OperandPrototype, OperandType as T, SpecialFeature,
};

use crate::operand::{OperandEval, OperandKind, Sign};

/// `SPEC_FULL.md` §9 Open Question #1: the scoring accumulator is signed.
pub type Score = i32;

fn operand_type_priority(ty: T) -> Score {
    match ty {
        T::Al | T::Ax | T::Eax | T::Dx | T::Cl | T::Cs | T::Ds | T::Es | T::Ss | T::Fs | T::Gs
        | T::One => 2,
        _ => 1,
    }
}

fn rel_delta(operand: &OperandEval, variant: &InstructionVariant, proto: &OperandPrototype, current_offset: u32) -> Option<i64> {
    let target = operand.known_value?;
    let instruction_len = variant.opcode.len() as i64 + (proto.size / 8) as i64;
    Some(target - (current_offset as i64 + instruction_len))
}

fn has_16_bit_rel_sibling(variants: &[InstructionVariant], variant: &InstructionVariant) -> bool {
    variants.iter().any(|v| {
        v.encoding == variant.encoding
            && v.opcode != variant.opcode
            && v.operands.len() == variant.operands.len()
            && v.operands.iter().any(|p| p.ty == T::Rel && p.size == 16)
    })
}

/// Picks the variant with the strictly greatest positive score; ties go to
/// the first one encountered (`SPEC_FULL.md` §4.3 step 4).
pub fn select_variant<'a>(
    variants: &'a [InstructionVariant],
    operands: &[OperandEval],
    current_offset: u32,
) -> Option<&'a InstructionVariant> {
    let mut best: Option<(&InstructionVariant, Score)> = None;

    'variant: for variant in variants {
        if variant.arity() != operands.len() {
            continue;
        }
        let mut score: Score = if operands.is_empty() { 1 } else { 0 };

        for (proto, operand) in variant.operands.iter().zip(operands.iter()) {
            if !operand.candidate_types.contains(&proto.ty) {
                continue 'variant;
            }

            if proto.ty == T::Rel {
                if let Some(delta) = rel_delta(operand, variant, proto, current_offset) {
                    if proto.size == 8
                        && !(-128..=127).contains(&delta)
                        && has_16_bit_rel_sibling(variants, variant)
                    {
                        continue 'variant;
                    }
                    score += 2;
                }
            } else {
                if proto.size > 0 && operand.min_bits > proto.size {
                    continue 'variant;
                }
                if operand.exact_size_required && proto.size > 0 && operand.min_bits != proto.size {
                    continue 'variant;
                }
            }

            if variant.feature == SpecialFeature::SignExtended {
                match operand.sign {
                    Sign::Signed => score += 1,
                    Sign::Unsigned => score -= operand.min_bits as Score,
                    Sign::None => {}
                }
                if operand.kind == OperandKind::Immediate
                    && proto.size == 8
                    && operand.sign == Sign::Unsigned
                {
                    continue 'variant;
                }
            }

            if proto.size > 0 && operand.min_bits == proto.size {
                score += 1;
            }

            score += operand_type_priority(proto.ty);
        }

        if score > 0 && matches!(variant.encoding, OpEn::Zo | OpEn::O) {
            score += 2;
        }

        if score > 0 && best.map_or(true, |(_, b)| score > b) {
            best = Some((variant, score));
        }
    }

    best.map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm86_types::isa;

    fn imm_operand(value: i64, min_bits: u16) -> OperandEval {
        OperandEval {
            kind: OperandKind::Immediate,
            candidate_types: vec![T::Imm, T::Rel, T::Ptr],
            min_bits,
            known_value: Some(value),
            sign: crate::operand::Sign::None,
            exact_size_required: false,
        }
    }

    fn register_operand(tags: Vec<T>, bits: u16) -> OperandEval {
        OperandEval {
            kind: OperandKind::Register,
            candidate_types: tags,
            min_bits: bits,
            known_value: None,
            sign: crate::operand::Sign::None,
            exact_size_required: true,
        }
    }

    #[test]
    fn mov_ax_immediate_picks_the_oi_wide_form() {
        let variants = isa::lookup("MOV").unwrap();
        let ax = register_operand(vec![T::R, T::Rm, T::Ax], 16);
        let imm = imm_operand(0x1234, 16);
        let chosen = select_variant(variants, &[ax, imm], 0).unwrap();
        assert_eq!(chosen.opcode, &[0xb8]);
    }

    #[test]
    fn add_ax_one_prefers_sign_extended_imm8_form() {
        let variants = isa::lookup("ADD").unwrap();
        let ax = register_operand(vec![T::R, T::Rm, T::Ax], 16);
        let one = imm_operand(1, 8);
        let chosen = select_variant(variants, &[ax, one], 0).unwrap();
        assert_eq!(chosen.opcode, &[0x83]);
    }

    #[test]
    fn short_jump_rejected_when_delta_out_of_range() {
        let variants = isa::lookup("JMP").unwrap();
        let far = imm_operand(5000, 16);
        let chosen = select_variant(variants, &[far], 0).unwrap();
        assert_eq!(chosen.opcode, &[0xe9]);
    }

    #[test]
    fn short_jump_selected_when_delta_fits() {
        let variants = isa::lookup("JMP").unwrap();
        let near = imm_operand(5, 16);
        let chosen = select_variant(variants, &[near], 0).unwrap();
        assert_eq!(chosen.opcode, &[0xeb]);
    }
}
