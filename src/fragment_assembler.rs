//! Splitting raw sample buffers into frames and reassembling fragment sequences
//! into per-frame JPEG-LS bitstreams.

use std::borrow::Cow;

use crate::codec::FrameLayout;
use crate::constants::JPEG_END_OF_IMAGE_BYTE;
use crate::error::CodecError;
use crate::fragment::FragmentSequence;

/// Splits `raw` into `frame_count` equal, ordered frames.
///
/// Trailing bytes are never dropped or padded: a length that does not divide
/// evenly is an error.
pub fn split_for_encode(raw: &[u8], frame_count: u32) -> Result<Vec<&[u8]>, CodecError> {
    let mismatch = CodecError::FrameLengthMismatch {
        length: raw.len(),
        frames: frame_count,
    };
    if frame_count == 0 {
        return Err(CodecError::EmptyVolume);
    }
    if raw.len() % frame_count as usize != 0 {
        return Err(mismatch);
    }
    let frame_len = raw.len() / frame_count as usize;
    if frame_len == 0 {
        return Err(mismatch);
    }
    Ok(raw.chunks_exact(frame_len).collect())
}

/// Returns `buffer` truncated just after the last end of image byte.
///
/// Fragments are padded to an even length, and some writers leave more than one
/// byte of padding after EOI. `index` only labels the error.
pub fn trim_to_end_marker(buffer: &[u8], index: usize) -> Result<&[u8], CodecError> {
    let end = buffer
        .iter()
        .rposition(|&b| b == JPEG_END_OF_IMAGE_BYTE)
        .ok_or(CodecError::MissingEndMarker { index })?;
    let trimmed = &buffer[..=end];
    if trimmed.len() != buffer.len() {
        tracing::trace!(
            fragment = index,
            padding = buffer.len() - trimmed.len(),
            "trimmed bytes after end of image"
        );
    }
    Ok(trimmed)
}

/// Turns a fragment sequence into one bitstream per frame.
///
/// A single frame may span any number of fragments and is flattened as-is. In a
/// volume each fragment holds exactly one frame, which is trimmed back to its end
/// of image marker.
pub fn join_for_decode(
    fragments: &FragmentSequence,
    layout: FrameLayout,
) -> Result<Vec<Cow<'_, [u8]>>, CodecError> {
    if let Some(index) = fragments.iter().position(|f| f.is_empty()) {
        return Err(CodecError::EmptyFragment { index });
    }

    match layout {
        FrameLayout::Single => {
            if fragments.is_empty() {
                return Err(CodecError::FrameCountMismatch {
                    expected: 1,
                    actual: 0,
                });
            }
            let stream = match fragments.len() {
                1 => Cow::Borrowed(fragments[0].as_bytes()),
                _ => Cow::Owned(fragments.to_buffer()),
            };
            Ok(vec![stream])
        }
        FrameLayout::Volume { frames: 0 } => Err(CodecError::EmptyVolume),
        FrameLayout::Volume { frames } => {
            if fragments.len() != frames as usize {
                return Err(CodecError::FrameCountMismatch {
                    expected: frames,
                    actual: fragments.len(),
                });
            }
            fragments
                .iter()
                .enumerate()
                .map(|(index, fragment)| trim_to_end_marker(fragment, index).map(Cow::Borrowed))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sequence(parts: &[&[u8]]) -> FragmentSequence {
        parts.iter().map(|p| (*p).into()).collect()
    }

    #[test]
    fn split_yields_equal_ordered_frames() {
        let raw: Vec<u8> = (0..12).collect();
        let frames = split_for_encode(&raw, 3).unwrap();
        assert_eq!(frames, vec![&raw[0..4], &raw[4..8], &raw[8..12]]);
    }

    #[test]
    fn split_rejects_uneven_length() {
        assert_eq!(
            split_for_encode(&[0u8; 10], 3),
            Err(CodecError::FrameLengthMismatch {
                length: 10,
                frames: 3
            })
        );
        assert_eq!(split_for_encode(&[0u8; 10], 0), Err(CodecError::EmptyVolume));
        assert!(split_for_encode(&[], 1).is_err());
    }

    #[test]
    fn trim_keeps_end_marker() {
        let data = [0xFF, 0xD8, 0x11, 0xFF, 0xD9, 0x00];
        assert_eq!(trim_to_end_marker(&data, 0), Ok(&data[..5]));
        assert_eq!(trim_to_end_marker(&data[..5], 0), Ok(&data[..5]));
    }

    #[test]
    fn trim_without_marker_fails() {
        assert_eq!(
            trim_to_end_marker(&[0xFF, 0xD8, 0x00], 4),
            Err(CodecError::MissingEndMarker { index: 4 })
        );
        assert_eq!(
            trim_to_end_marker(&[], 0),
            Err(CodecError::MissingEndMarker { index: 0 })
        );
    }

    #[test]
    fn single_frame_flattens_all_fragments() {
        let seq = sequence(&[&[1, 2], &[3], &[4, 0xD9, 0]]);
        let joined = join_for_decode(&seq, FrameLayout::Single).unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(&*joined[0], &[1, 2, 3, 4, 0xD9, 0]);
    }

    #[test]
    fn volume_requires_one_fragment_per_frame() {
        let seq = sequence(&[&[0xD9], &[0xD9]]);
        assert_eq!(
            join_for_decode(&seq, FrameLayout::Volume { frames: 3 }),
            Err(CodecError::FrameCountMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(join_for_decode(&seq, FrameLayout::Volume { frames: 1 }).is_err());
    }

    #[test]
    fn zero_frame_volume_is_rejected() {
        assert_eq!(
            join_for_decode(&FragmentSequence::new(), FrameLayout::Volume { frames: 0 }),
            Err(CodecError::EmptyVolume)
        );
        assert_eq!(
            join_for_decode(&sequence(&[&[0xD9]]), FrameLayout::Volume { frames: 0 }),
            Err(CodecError::EmptyVolume)
        );
    }

    #[test]
    fn volume_frames_are_trimmed() {
        let seq = sequence(&[&[1, 0xD9, 0], &[2, 0xD9]]);
        let joined = join_for_decode(&seq, FrameLayout::Volume { frames: 2 }).unwrap();
        assert_eq!(&*joined[0], &[1, 0xD9]);
        assert_eq!(&*joined[1], &[2, 0xD9]);
    }

    #[test]
    fn empty_fragment_aborts() {
        let seq = sequence(&[&[0xD9], &[]]);
        assert_eq!(
            join_for_decode(&seq, FrameLayout::Volume { frames: 2 }),
            Err(CodecError::EmptyFragment { index: 1 })
        );
        assert_eq!(
            join_for_decode(&seq, FrameLayout::Single),
            Err(CodecError::EmptyFragment { index: 1 })
        );
    }

    proptest! {
        #[test]
        fn split_concatenates_back(frame_len in 1usize..64, frames in 1u32..8) {
            let raw: Vec<u8> = (0..frame_len * frames as usize).map(|i| i as u8).collect();
            let parts = split_for_encode(&raw, frames).unwrap();
            prop_assert_eq!(parts.len(), frames as usize);
            prop_assert_eq!(parts.concat(), raw);
        }

        #[test]
        fn trim_ends_at_last_marker(data in proptest::collection::vec(any::<u8>(), 0..128)) {
            match trim_to_end_marker(&data, 0) {
                Ok(trimmed) => {
                    prop_assert_eq!(trimmed.last(), Some(&0xD9));
                    prop_assert!(!data[trimmed.len()..].contains(&0xD9));
                }
                Err(err) => {
                    prop_assert!(!data.contains(&0xD9));
                    prop_assert_eq!(err, CodecError::MissingEndMarker { index: 0 });
                }
            }
        }
    }
}
