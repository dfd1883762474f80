use serde_json::{json, Map, Value};

use super::{Profile, ProfileError, ProfileReader};
use crate::graph::{Graph, Node};
use crate::record::{push_extra, push_to_list, Record};
use crate::vocab::{adms, dcat, dct, foaf, owl};

const NAME: &str = "dcat_ap";

/// DCAT application profile for European data portals.
///
/// Writes the common catalog fields at the record root, everything else as
/// `{key, value}` pairs in `extras`, and one entry in `resources` per
/// distribution.
#[derive(Debug, Default, Clone, Copy)]
pub struct DcatApProfile;

impl Profile for DcatApProfile {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse_dataset(
        &self,
        record: &mut Record,
        dataset: &Node,
        graph: &Graph,
    ) -> Result<(), ProfileError> {
        let reader = ProfileReader::new(graph);

        for (key, predicate) in [
            ("title", dct::TITLE),
            ("notes", dct::DESCRIPTION),
            ("url", dcat::LANDING_PAGE),
            ("version", owl::VERSION_INFO),
        ] {
            if let Some(value) = reader.object_value(dataset, predicate) {
                record.insert(key.to_string(), value.into());
            }
        }

        let has_version = record
            .get("version")
            .and_then(Value::as_str)
            .is_some_and(|v| !v.is_empty());
        if !has_version {
            // adms:version was used by the first DCAT-AP release.
            if let Some(value) = reader.object_value(dataset, adms::VERSION) {
                record.insert("version".to_string(), value.into());
            }
        }

        let tags: Vec<Value> = reader
            .keywords(dataset)
            .into_iter()
            .map(|tag| json!({ "name": tag }))
            .collect();
        record.insert("tags".to_string(), Value::Array(tags));

        for (key, predicate) in [
            ("issued", dct::ISSUED),
            ("modified", dct::MODIFIED),
            ("identifier", dct::IDENTIFIER),
            ("version_notes", adms::VERSION_NOTES),
            ("frequency", dct::ACCRUAL_PERIODICITY),
            ("provenance", dct::PROVENANCE),
            ("dcat_type", dct::TYPE),
        ] {
            if let Some(value) = reader.object_value(dataset, predicate) {
                push_extra(record, key, value);
            }
        }

        for (key, predicate) in [
            ("language", dct::LANGUAGE),
            ("theme", dcat::THEME),
            ("alternate_identifier", adms::IDENTIFIER),
            ("conforms_to", dct::CONFORMS_TO),
            ("documentation", foaf::PAGE),
            ("related_resource", dct::RELATION),
            ("has_version", dct::HAS_VERSION),
            ("is_version_of", dct::IS_VERSION_OF),
            ("source", dct::SOURCE),
            ("sample", adms::SAMPLE),
        ] {
            let values = reader.object_values(dataset, predicate);
            if !values.is_empty() {
                push_extra(record, key, Value::from(values).to_string());
            }
        }

        let contact = reader
            .contact_details(dataset, dcat::CONTACT_POINT)
            .or_else(|| reader.contact_details(dataset, adms::CONTACT_POINT));
        if let Some(contact) = contact {
            for (key, value) in [
                ("contact_uri", contact.uri),
                ("contact_name", contact.name),
                ("contact_email", contact.email),
            ] {
                if let Some(value) = value {
                    push_extra(record, key, value);
                }
            }
        }

        let publisher = reader.publisher(dataset, dct::PUBLISHER);
        for (key, value) in [
            ("publisher_uri", publisher.uri),
            ("publisher_name", publisher.name),
            ("publisher_email", publisher.email),
            ("publisher_url", publisher.url),
            ("publisher_type", publisher.kind),
        ] {
            if let Some(value) = value {
                push_extra(record, key, value);
            }
        }

        let (start, end) = reader.time_interval(dataset, dct::TEMPORAL);
        if let Some(start) = start {
            push_extra(record, "temporal_start", start);
        }
        if let Some(end) = end {
            push_extra(record, "temporal_end", end);
        }

        let spatial = reader.spatial(dataset, dct::SPATIAL);
        for (key, value) in [
            ("spatial_uri", spatial.uri),
            ("spatial_text", spatial.text),
            ("spatial", spatial.geom),
        ] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                push_extra(record, key, value);
            }
        }

        // Explicitly empty for blank-node datasets.
        push_extra(record, "uri", dataset.as_iri().unwrap_or_default());

        if let Some(rights) = reader.access_rights(dataset, dct::ACCESS_RIGHTS) {
            push_extra(record, "access_rights", rights);
        }

        if !record.contains_key("license_id") {
            record.insert(
                "license_id".to_string(),
                reader.license(dataset).unwrap_or_default().into(),
            );
        }

        if !record.contains_key("resources") {
            record.insert("resources".to_string(), Value::Array(Vec::new()));
        }
        for distribution in reader.distributions(dataset) {
            let resource = parse_distribution(&reader, distribution)?;
            push_to_list(record, "resources", Value::Object(resource));
        }

        Ok(())
    }
}

fn parse_distribution(
    reader: &ProfileReader<'_>,
    distribution: &Node,
) -> Result<Map<String, Value>, ProfileError> {
    let mut resource = Map::new();

    for (key, predicate) in [
        ("name", dct::TITLE),
        ("description", dct::DESCRIPTION),
        ("access_url", dcat::ACCESS_URL),
        ("download_url", dcat::DOWNLOAD_URL),
        ("issued", dct::ISSUED),
        ("modified", dct::MODIFIED),
        ("status", adms::STATUS),
        ("license", dct::LICENSE),
    ] {
        if let Some(value) = reader.object_value(distribution, predicate) {
            resource.insert(key.to_string(), value.into());
        }
    }

    let url = reader
        .object_value(distribution, dcat::DOWNLOAD_URL)
        .or_else(|| reader.object_value(distribution, dcat::ACCESS_URL));
    resource.insert("url".to_string(), url.map_or(Value::Null, Value::from));

    for (key, predicate) in [
        ("language", dct::LANGUAGE),
        ("documentation", foaf::PAGE),
        ("conforms_to", dct::CONFORMS_TO),
    ] {
        let values = reader.object_values(distribution, predicate);
        if !values.is_empty() {
            resource.insert(key.to_string(), Value::from(values).to_string().into());
        }
    }

    if let Some(rights) = reader.access_rights(distribution, dct::RIGHTS) {
        resource.insert("rights".to_string(), rights.into());
    }

    let (media_type, label) = reader.distribution_format(distribution);
    if let Some(label) = label.or_else(|| media_type.clone()) {
        resource.insert("format".to_string(), label.into());
    }
    if let Some(media_type) = media_type {
        resource.insert("mimetype".to_string(), media_type.into());
    }

    if let Some(size) = reader.object_int(NAME, distribution, dcat::BYTE_SIZE)? {
        resource.insert("size".to_string(), size.into());
    }

    let uri = distribution.as_iri().unwrap_or_default();
    resource.insert("uri".to_string(), uri.into());
    // Kept so later profiles can find the distribution node again.
    resource.insert(
        "distribution_ref".to_string(),
        distribution.as_str().into(),
    );

    Ok(resource)
}
