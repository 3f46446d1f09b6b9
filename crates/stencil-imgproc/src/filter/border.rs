/// Map a possibly out-of-range coordinate to the nearest valid index in `[0, len)`.
///
/// This is the replicate (clamp-to-edge) border: pixels outside the image take the value
/// of the closest border pixel.
///
/// PRECONDITION: `len > 0`.
#[inline]
pub fn clamp_index(idx: isize, len: usize) -> usize {
    idx.clamp(0, len as isize - 1) as usize
}

/// The clamped indices of `center - 1`, `center` and `center + 1` along an axis of `len`.
#[inline]
pub fn neighbors(center: usize, len: usize) -> [usize; 3] {
    let c = center as isize;
    [
        clamp_index(c - 1, len),
        clamp_index(c, len),
        clamp_index(c + 1, len),
    ]
}
