#[cfg(test)]
mod tests {
    use crate::merkle_path::Content;
    use crate::{MerklePath, ProofBundle, SiblingNode};
    use prost::Message;

    fn sample_bundle() -> ProofBundle {
        ProofBundle {
            paths: vec![
                MerklePath {
                    content: Some(Content::Leaf(b"item".to_vec())),
                    siblings: vec![SiblingNode {
                        is_left: true,
                        hash: vec![7u8; 48],
                    }],
                    next_path_index: 1,
                },
                MerklePath {
                    content: Some(Content::StartHash(vec![9u8; 48])),
                    siblings: vec![],
                    next_path_index: -1,
                },
            ],
            signature: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_bundle_survives_binary_encoding() {
        let bundle = sample_bundle();
        let bytes = bundle.encode_to_vec();
        let decoded = ProofBundle::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, bundle);
        assert_eq!(decoded.paths[1].next_path_index, -1);
    }

    #[test]
    fn test_missing_content_decodes_as_none() {
        let path = MerklePath {
            content: None,
            siblings: vec![],
            next_path_index: -1,
        };
        let decoded = MerklePath::decode(path.encode_to_vec().as_slice()).unwrap();
        assert!(decoded.content.is_none());
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        // Field 15, length-delimited, two bytes of payload
        let mut bytes = sample_bundle().encode_to_vec();
        bytes.extend_from_slice(&[0x7a, 0x02, 0xaa, 0xbb]);
        let decoded = ProofBundle::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, sample_bundle());
    }

    #[test]
    fn test_bundle_json_serialization() {
        let json = serde_json::to_string(&sample_bundle()).unwrap();
        assert!(json.contains("next_path_index"));

        let parsed: ProofBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_bundle());
    }
}
