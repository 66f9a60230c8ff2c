/// Property-based tests for variant decoding
///
/// Uses proptest to throw arbitrary scalar combinations at the decoder and
/// verify that the resolved invariants always hold.
///
/// Run with: cargo test --features dev-tools --test variant_proptest

#[cfg(feature = "dev-tools")]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;
    use streamvariant::StreamOutputVariant;

    proptest! {
        #[test]
        fn decode_resolves_invariants(
            video_bitrate in 0u32..20_000,
            audio_bitrate in 0u32..1_000,
            framerate in 0u32..240,
            video_passthrough: bool,
            audio_passthrough: bool,
        ) {
            let raw = json!({
                "videoPassthrough": video_passthrough,
                "audioPassthrough": audio_passthrough,
                "videoBitrate": video_bitrate,
                "audioBitrate": audio_bitrate,
                "framerate": framerate,
            });
            let variant = StreamOutputVariant::from_value(&raw).unwrap();

            prop_assert!(variant.framerate > 0);
            if video_bitrate == 0 {
                prop_assert!(variant.video_passthrough);
            }
            if audio_bitrate == 0 {
                prop_assert!(variant.audio_passthrough);
                prop_assert!(variant.is_audio_passthrough());
            }
            if variant.video_passthrough {
                prop_assert_eq!(variant.effective_framerate(), 0);
                prop_assert_eq!(variant.effective_encoder_preset(), "");
            } else {
                prop_assert!(variant.effective_framerate() > 0);
            }
        }

        #[test]
        fn encode_then_decode_is_stable(
            video_bitrate in 0u32..20_000,
            audio_bitrate in 0u32..1_000,
            framerate in 0u32..240,
            scaled_width in 0u32..4096,
            cpu_usage_level in 0u32..8,
        ) {
            let first = StreamOutputVariant::from_value(&json!({
                "videoBitrate": video_bitrate,
                "audioBitrate": audio_bitrate,
                "framerate": framerate,
                "scaledWidth": scaled_width,
                "cpuUsageLevel": cpu_usage_level,
            })).unwrap();

            let encoded = serde_json::to_value(&first).unwrap();
            let second = StreamOutputVariant::from_value(&encoded).unwrap();

            // Everything except framerate survives the round trip
            // unchanged; framerate is normalized to the effective value.
            prop_assert_eq!(second.video_passthrough, first.video_passthrough);
            prop_assert_eq!(second.audio_passthrough, first.audio_passthrough);
            prop_assert_eq!(second.video_bitrate, first.video_bitrate);
            prop_assert_eq!(second.audio_bitrate, first.audio_bitrate);
            prop_assert_eq!(second.scaled_width, first.scaled_width);
            prop_assert_eq!(second.scaled_height, first.scaled_height);
            prop_assert_eq!(&second.encoder_preset, &first.encoder_preset);
            prop_assert_eq!(second.cpu_usage_level, first.cpu_usage_level);
            if !first.video_passthrough {
                prop_assert_eq!(second.framerate, first.framerate);
            }
        }

        #[test]
        fn wrong_scalar_types_never_panic(
            bad in prop::sample::select(vec![
                json!({"videoPassthrough": "yes"}),
                json!({"audioPassthrough": 1}),
                json!({"videoBitrate": true}),
                json!({"framerate": [24]}),
                json!({"encoderPreset": 3}),
                json!({"cpuUsageLevel": {"level": 3}}),
            ]),
        ) {
            prop_assert!(StreamOutputVariant::from_value(&bad).is_err());
        }
    }
}
