//! Property tests: entities survive a serialize/deserialize round trip.

use hmm_core::{AuthorId, AutomobileInfo, NoteCatalog, NoteId, Verdict};
use hmm_serializer::{AutomobileSerializer, NoteSerializer, Stage};
use proptest::prelude::*;

const NS: &str = "http://schema.hmm.com/2020";

fn automobile() -> impl Strategy<Value = AutomobileInfo> {
    let text = "[a-zA-Z0-9 <>&'\"-]{0,16}";
    (
        (text, text, 1900u32..2100),
        (text, text, text),
        any::<i64>(),
        1i64..1_000,
    )
        .prop_map(|((maker, brand, year), (color, pin, plate), meter_reading, author)| {
            AutomobileInfo {
                maker,
                brand,
                year: year.to_string(),
                color,
                pin,
                plate,
                meter_reading,
                author_id: AuthorId(author),
                ..AutomobileInfo::default()
            }
        })
}

proptest! {
    #[test]
    fn automobile_round_trips(car in automobile(), id in 1i64..10_000) {
        let pipeline =
            NoteSerializer::new(AutomobileSerializer, NoteCatalog::new("Automobile", NS));

        let note = pipeline.serialize(Some(&car)).value.unwrap().with_id(NoteId(id));
        let read = pipeline.deserialize(&note);
        prop_assert_eq!(read.stage, Stage::Extracted);
        prop_assert_eq!(read.outcome.verdict(), Verdict::Success);

        let back = read.value.unwrap();
        prop_assert_eq!(back.id, NoteId(id));
        prop_assert_eq!(AutomobileInfo { id: NoteId::UNSAVED, ..back }, car);
    }

    #[test]
    fn arbitrary_content_never_panics(content in "\\PC{0,64}") {
        let pipeline =
            NoteSerializer::new(AutomobileSerializer, NoteCatalog::new("Automobile", NS));
        let note = hmm_core::Note::draft("Automobile", content, "Automobile", AuthorId(1));
        let read = pipeline.deserialize(&note);
        prop_assert!(read.stage.is_terminal());
        prop_assert_eq!(read.value.is_some(), read.stage == Stage::Extracted);
    }
}
