use dnstoys_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

/// Maps hickory question types onto the ones the services see.
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        match hickory_type {
            HickoryRecordType::A => RecordType::A,
            HickoryRecordType::AAAA => RecordType::AAAA,
            HickoryRecordType::TXT => RecordType::TXT,
            HickoryRecordType::ANY => RecordType::ANY,
            other => RecordType::Other(u16::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types_map_directly() {
        for (hickory, rt) in [
            (HickoryRecordType::A, RecordType::A),
            (HickoryRecordType::AAAA, RecordType::AAAA),
            (HickoryRecordType::TXT, RecordType::TXT),
            (HickoryRecordType::ANY, RecordType::ANY),
        ] {
            assert_eq!(RecordTypeMapper::from_hickory(hickory), rt);
        }
    }

    #[test]
    fn test_unknown_types_keep_their_code() {
        assert_eq!(
            RecordTypeMapper::from_hickory(HickoryRecordType::MX),
            RecordType::Other(15)
        );
    }
}
