/// Data masking: XOR every non-function module with the mask pattern
use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// Remove a mask pattern from the data modules
pub fn unmask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let width = matrix.width();
    let height = matrix.height();

    for y in 0..height {
        for x in 0..width {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

/// Apply a mask pattern; XOR makes this the same operation as [`unmask`]
pub fn mask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    unmask(matrix, mask_pattern, func);
}
