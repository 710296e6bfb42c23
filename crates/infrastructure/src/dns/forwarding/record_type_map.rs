use dnstester_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        match record_type {
            // Basic records
            RecordType::A => HickoryRecordType::A,
            RecordType::AAAA => HickoryRecordType::AAAA,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::TXT => HickoryRecordType::TXT,
            RecordType::PTR => HickoryRecordType::PTR,
            RecordType::ANY => HickoryRecordType::ANY,

            // Advanced records
            RecordType::SRV => HickoryRecordType::SRV,
            RecordType::SOA => HickoryRecordType::SOA,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::NAPTR => HickoryRecordType::NAPTR,
            RecordType::SVCB => HickoryRecordType::SVCB,
            RecordType::HTTPS => HickoryRecordType::HTTPS,

            // Security records
            RecordType::CAA => HickoryRecordType::CAA,
            RecordType::TLSA => HickoryRecordType::TLSA,
            RecordType::SSHFP => HickoryRecordType::SSHFP,
            RecordType::OPENPGPKEY => HickoryRecordType::OPENPGPKEY,

            // DNSSEC records
            RecordType::DS => HickoryRecordType::DS,
            RecordType::DNSKEY => HickoryRecordType::DNSKEY,
            RecordType::RRSIG => HickoryRecordType::RRSIG,
            RecordType::NSEC => HickoryRecordType::NSEC,
            RecordType::NSEC3 => HickoryRecordType::NSEC3,
            RecordType::CDS => HickoryRecordType::CDS,
            RecordType::CDNSKEY => HickoryRecordType::CDNSKEY,

            // Legacy/Informational records
            RecordType::NULL => HickoryRecordType::NULL,
            RecordType::HINFO => HickoryRecordType::HINFO,
        }
    }

    /// Convert hickory RecordType → domain RecordType.
    ///
    /// Returns `None` for types the tester does not query.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordType> {
        let mapped = match hickory_type {
            HickoryRecordType::A => RecordType::A,
            HickoryRecordType::AAAA => RecordType::AAAA,
            HickoryRecordType::CNAME => RecordType::CNAME,
            HickoryRecordType::MX => RecordType::MX,
            HickoryRecordType::TXT => RecordType::TXT,
            HickoryRecordType::PTR => RecordType::PTR,
            HickoryRecordType::ANY => RecordType::ANY,
            HickoryRecordType::SRV => RecordType::SRV,
            HickoryRecordType::SOA => RecordType::SOA,
            HickoryRecordType::NS => RecordType::NS,
            HickoryRecordType::NAPTR => RecordType::NAPTR,
            HickoryRecordType::SVCB => RecordType::SVCB,
            HickoryRecordType::HTTPS => RecordType::HTTPS,
            HickoryRecordType::CAA => RecordType::CAA,
            HickoryRecordType::TLSA => RecordType::TLSA,
            HickoryRecordType::SSHFP => RecordType::SSHFP,
            HickoryRecordType::OPENPGPKEY => RecordType::OPENPGPKEY,
            HickoryRecordType::DS => RecordType::DS,
            HickoryRecordType::DNSKEY => RecordType::DNSKEY,
            HickoryRecordType::RRSIG => RecordType::RRSIG,
            HickoryRecordType::NSEC => RecordType::NSEC,
            HickoryRecordType::NSEC3 => RecordType::NSEC3,
            HickoryRecordType::CDS => RecordType::CDS,
            HickoryRecordType::CDNSKEY => RecordType::CDNSKEY,
            HickoryRecordType::NULL => RecordType::NULL,
            HickoryRecordType::HINFO => RecordType::HINFO,
            _ => return None,
        };
        Some(mapped)
    }
}
