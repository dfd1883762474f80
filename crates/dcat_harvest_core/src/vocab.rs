//! IRIs of the vocabulary terms the harvester reads.

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

pub mod dcat {
    pub const CATALOG: &str = "http://www.w3.org/ns/dcat#Catalog";
    pub const DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";
    pub const DATASET_LINK: &str = "http://www.w3.org/ns/dcat#dataset";
    pub const DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#distribution";
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    pub const THEME: &str = "http://www.w3.org/ns/dcat#theme";
    pub const LANDING_PAGE: &str = "http://www.w3.org/ns/dcat#landingPage";
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
    pub const ACCESS_URL: &str = "http://www.w3.org/ns/dcat#accessURL";
    pub const DOWNLOAD_URL: &str = "http://www.w3.org/ns/dcat#downloadURL";
    pub const MEDIA_TYPE: &str = "http://www.w3.org/ns/dcat#mediaType";
    pub const BYTE_SIZE: &str = "http://www.w3.org/ns/dcat#byteSize";
    pub const START_DATE: &str = "http://www.w3.org/ns/dcat#startDate";
    pub const END_DATE: &str = "http://www.w3.org/ns/dcat#endDate";
}

pub mod dct {
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
    pub const LANGUAGE: &str = "http://purl.org/dc/terms/language";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
    pub const RIGHTS: &str = "http://purl.org/dc/terms/rights";
    pub const ACCESS_RIGHTS: &str = "http://purl.org/dc/terms/accessRights";
    pub const ACCRUAL_PERIODICITY: &str = "http://purl.org/dc/terms/accrualPeriodicity";
    pub const PROVENANCE: &str = "http://purl.org/dc/terms/provenance";
    pub const TYPE: &str = "http://purl.org/dc/terms/type";
    pub const TEMPORAL: &str = "http://purl.org/dc/terms/temporal";
    pub const CONFORMS_TO: &str = "http://purl.org/dc/terms/conformsTo";
    pub const RELATION: &str = "http://purl.org/dc/terms/relation";
    pub const HAS_VERSION: &str = "http://purl.org/dc/terms/hasVersion";
    pub const IS_VERSION_OF: &str = "http://purl.org/dc/terms/isVersionOf";
    pub const SOURCE: &str = "http://purl.org/dc/terms/source";
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    pub const SPATIAL: &str = "http://purl.org/dc/terms/spatial";
    pub const LOCATION: &str = "http://purl.org/dc/terms/Location";
}

pub mod locn {
    pub const GEOMETRY: &str = "http://www.w3.org/ns/locn#geometry";
}

pub mod skos {
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

/// Datatype of GeoJSON geometry literals.
pub const GEOJSON_MEDIA_TYPE: &str =
    "https://www.iana.org/assignments/media-types/application/vnd.geo+json";

pub mod adms {
    pub const VERSION: &str = "http://www.w3.org/ns/adms#version";
    pub const VERSION_NOTES: &str = "http://www.w3.org/ns/adms#versionNotes";
    pub const IDENTIFIER: &str = "http://www.w3.org/ns/adms#identifier";
    pub const SAMPLE: &str = "http://www.w3.org/ns/adms#sample";
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/adms#contactPoint";
    pub const STATUS: &str = "http://www.w3.org/ns/adms#status";
}

pub mod owl {
    pub const VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
}

pub mod foaf {
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";
    pub const HOMEPAGE: &str = "http://xmlns.com/foaf/0.1/homepage";
    pub const PAGE: &str = "http://xmlns.com/foaf/0.1/page";
}

pub mod vcard {
    pub const FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
    pub const HAS_EMAIL: &str = "http://www.w3.org/2006/vcard/ns#hasEmail";
}

pub mod schema {
    pub const START_DATE: &str = "http://schema.org/startDate";
    pub const END_DATE: &str = "http://schema.org/endDate";
}

/// Hydra paged-collection terms used for pagination.
pub mod hydra {
    pub const PAGED_COLLECTION: &str = "http://www.w3.org/ns/hydra/core#PagedCollection";
    pub const NEXT: &str = "http://www.w3.org/ns/hydra/core#next";
    /// Deprecated alias of [`NEXT`], still emitted by older endpoints.
    pub const NEXT_PAGE: &str = "http://www.w3.org/ns/hydra/core#nextPage";
}
