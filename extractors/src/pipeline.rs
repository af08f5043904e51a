use shared_types::{
    EventRecord, ExtractionError, ExtractionInput, ExtractionPolicy, Extractor, RecordField,
    SourceContext,
};

use crate::fields::{
    DateExtractor, LocationExtractor, OrganizerExtractor, RegistrationExtractor, TitleExtractor,
};

/// Runs the five field extractors over one caption and assembles the record.
///
/// The pipeline holds no per-call state, so one instance can serve any number
/// of captions, from any number of threads.
pub struct FieldExtractionPipeline {
    date: DateExtractor,
    title: TitleExtractor,
    organizers: OrganizerExtractor,
    location: LocationExtractor,
    registration: RegistrationExtractor,
}

impl FieldExtractionPipeline {
    pub fn new(current_year: i32, policy: &ExtractionPolicy) -> Self {
        Self {
            date: DateExtractor::new(current_year),
            title: TitleExtractor::new(policy.untitled_title.clone()),
            organizers: OrganizerExtractor::new(),
            location: LocationExtractor::new(policy.unresolved_sentinel.clone()),
            registration: RegistrationExtractor::new(policy.unresolved_sentinel.clone()),
        }
    }

    pub fn with_defaults(current_year: i32) -> Self {
        Self::new(current_year, &ExtractionPolicy::default())
    }

    /// Extract a record. Never fails: unresolved fields hold their sentinel.
    pub fn process(&self, caption: &str, context: &SourceContext) -> EventRecord {
        let input = ExtractionInput::new(caption, context);

        let record = EventRecord::new(
            self.date.extract(&input),
            self.title.extract(&input),
            self.organizers.extract(&input),
            self.location.extract(&input),
            self.registration.extract(&input),
            context.source_url.clone(),
        );

        tracing::debug!(source_url = %context.source_url, ?record, "Extracted event record");
        record
    }

    /// Extract from raw bytes, rejecting input that is not UTF-8 text
    pub fn process_bytes(
        &self,
        caption: &[u8],
        context: &SourceContext,
    ) -> Result<EventRecord, ExtractionError> {
        let caption = std::str::from_utf8(caption).map_err(|e| {
            ExtractionError::InvalidInput(format!("Caption is not UTF-8 text: {}", e))
        })?;

        Ok(self.process(caption, context))
    }

    /// The extractors, in column order
    pub fn extractors(&self) -> [&dyn Extractor; 5] {
        [
            &self.date,
            &self.title,
            &self.organizers,
            &self.location,
            &self.registration,
        ]
    }

    /// Disable one rule of the extractor that fills `field`
    pub fn disable_rule(&mut self, field: RecordField, rule: &str) -> Result<(), ExtractionError> {
        match field {
            RecordField::EventDate => self.date.rules_mut().disable(rule),
            RecordField::Title => self.title.rules_mut().disable(rule),
            RecordField::Organizers => self.organizers.rules_mut().disable(rule),
            RecordField::Location => self.location.rules_mut().disable(rule),
            RecordField::RegistrationLink => self.registration.rules_mut().disable(rule),
            RecordField::SourceUrl => Err(ExtractionError::ConfigError(
                "source-url is copied from the post and has no rules".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::COLUMN_COUNT;

    const POST_URL: &str = "https://www.instagram.com/p/C1a2b3/";

    fn sample_caption() -> &'static str {
        "JAKARTA COFFEE WEEK\n\
         Tema: Kopi Pagi\n\
         📅 25 Oct 2024\n\
         📍 Senayan Park\n\
         collab by @foo and Bar x @baz\n\
         Free for students, tiket umum: https://bit.ly/kopi-pagi.\n\
         #kopi #jakarta"
    }

    #[test]
    fn test_full_caption() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        let context = SourceContext::new(POST_URL).with_owner("jktinfo");
        let record = pipeline.process(sample_caption(), &context);

        assert_eq!(record.event_date(), "2024-10-25");
        assert_eq!(record.title(), "Kopi Pagi");
        assert_eq!(record.organizers(), "@baz, @foo, @jktinfo, Bar");
        assert_eq!(record.location(), "Senayan Park");
        assert_eq!(record.registration_link(), "https://bit.ly/kopi-pagi");
        assert_eq!(record.source_url(), POST_URL);
    }

    #[test]
    fn test_empty_caption_is_fully_defaulted() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        let record = pipeline.process("", &SourceContext::new(POST_URL));

        assert_eq!(
            record.to_row(),
            ["", "Untitled Event", "", "-", "-", POST_URL]
        );
    }

    #[test]
    fn test_policy_sentinels() {
        let policy = ExtractionPolicy {
            unresolved_sentinel: String::new(),
            untitled_title: "?".to_string(),
        };
        let pipeline = FieldExtractionPipeline::new(2025, &policy);
        let record = pipeline.process("", &SourceContext::new(POST_URL));

        assert_eq!(record.to_row(), ["", "?", "", "", "", POST_URL]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        let context = SourceContext::new(POST_URL).with_owner("jktinfo");

        let first = pipeline.process(sample_caption(), &context);
        let second = pipeline.process(sample_caption(), &context);
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_input_yields_six_fields() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        let context = SourceContext::new(POST_URL);

        for caption in ["", " ", "\n\n", "x", "🎉🎉🎉", "**", "@", "12 -", "http://", "a x b"] {
            let row = pipeline.process(caption, &context).to_row();
            assert_eq!(row.len(), COLUMN_COUNT);
            assert!(!row[1].is_empty(), "title empty for {caption:?}");
        }
    }

    #[test]
    fn test_organizers_are_sorted_and_unique() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        let context = SourceContext::new("https://www.instagram.com/zeta/");
        let record = pipeline.process("@beta @alpha @beta Gamma x @alpha @zeta", &context);

        let tokens: Vec<&str> = record.organizers().split(", ").collect();
        let mut sorted = tokens.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(tokens, sorted);
        assert_eq!(record.organizers(), "@alpha, @beta, @zeta, Gamma");
    }

    #[test]
    fn test_process_bytes_rejects_non_text() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        let context = SourceContext::new(POST_URL);

        let result = pipeline.process_bytes(&[0xff, 0xfe, 0x00], &context);
        assert!(matches!(result, Err(ExtractionError::InvalidInput(_))));

        let record = pipeline
            .process_bytes("event on 5 dec".as_bytes(), &context)
            .unwrap();
        assert_eq!(record.event_date(), "2025-12-05");
    }

    #[test]
    fn test_extractors_are_in_column_order() {
        let pipeline = FieldExtractionPipeline::with_defaults(2025);
        for (index, extractor) in pipeline.extractors().iter().enumerate() {
            assert_eq!(extractor.field().column_index(), index);
            assert!(!extractor.rule_names().is_empty());
        }
    }

    #[test]
    fn test_disable_rule() {
        let mut pipeline = FieldExtractionPipeline::with_defaults(2025);
        pipeline.disable_rule(RecordField::Title, "label-line").unwrap();

        let record = pipeline.process("Tema: Kopi Pagi\n**Bold Title**", &SourceContext::new(POST_URL));
        assert_eq!(record.title(), "Bold Title");

        assert!(pipeline.disable_rule(RecordField::SourceUrl, "any").is_err());
        assert!(pipeline.disable_rule(RecordField::Title, "label-line").is_err());
    }

    #[test]
    fn test_pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldExtractionPipeline>();
    }
}
