//! The compiled-in weekly dataset: day/slot tables, teacher availability and
//! the session templates for one school week. This is the single source the
//! solve runs from; there is no runtime input.

use std::collections::{BTreeMap, HashMap, HashSet};
use types::{Day, SessionTemplate, Slot, TeacherId, TimetableData};

const FULL_DAY: [Slot; 5] = [1, 2, 3, 4, 5];
const SHORT_THU: [Slot; 4] = [1, 2, 3, 4];
const LATE_FRI: [Slot; 2] = [4, 5];

fn slots_by_day() -> BTreeMap<Day, Vec<Slot>> {
    let mut table = BTreeMap::new();
    table.insert(Day::Mon, FULL_DAY.to_vec());
    table.insert(Day::Tue, FULL_DAY.to_vec());
    table.insert(Day::Wed, FULL_DAY.to_vec());
    table.insert(Day::Thu, FULL_DAY.to_vec());
    // Friday runs the two late slots only.
    table.insert(Day::Fri, LATE_FRI.to_vec());
    table
}

fn teacher_availability() -> HashMap<TeacherId, HashSet<(Day, Slot)>> {
    let mut map: HashMap<TeacherId, HashSet<(Day, Slot)>> = HashMap::new();
    let mut add = |teacher: &str, days: &[(Day, &[Slot])]| {
        let flat: HashSet<(Day, Slot)> = days
            .iter()
            .flat_map(|(day, slots)| slots.iter().map(move |&slot| (*day, slot)))
            .collect();
        map.insert(TeacherId::from(teacher), flat);
    };

    add(
        "Sanya",
        &[
            (Day::Mon, &FULL_DAY),
            (Day::Tue, &FULL_DAY),
            (Day::Wed, &FULL_DAY),
        ],
    );
    add(
        "Usha",
        &[
            (Day::Mon, &FULL_DAY),
            (Day::Wed, &FULL_DAY),
            (Day::Thu, &SHORT_THU),
        ],
    );
    add(
        "Guru",
        &[
            (Day::Mon, &FULL_DAY),
            (Day::Wed, &FULL_DAY),
            (Day::Thu, &SHORT_THU),
        ],
    );
    add("Gayatri", &[(Day::Tue, &FULL_DAY), (Day::Thu, &SHORT_THU)]);
    add(
        "Zeba",
        &[
            (Day::Mon, &FULL_DAY),
            (Day::Tue, &FULL_DAY),
            (Day::Wed, &FULL_DAY),
            (Day::Thu, &SHORT_THU),
            (Day::Fri, &LATE_FRI),
        ],
    );
    add(
        "Shravani",
        &[
            (Day::Mon, &FULL_DAY),
            (Day::Tue, &FULL_DAY),
            (Day::Wed, &FULL_DAY),
            (Day::Thu, &SHORT_THU),
            (Day::Fri, &LATE_FRI),
        ],
    );

    map
}

fn session_templates() -> Vec<SessionTemplate> {
    let st = SessionTemplate::new;
    vec![
        // Sanya (Math)
        st("Sanya", "Sanya_1", "Math", 3, &["Ekaansh", "Parth"]),
        st("Sanya", "Sanya_2", "Math", 3, &["Nithil", "Aakash", "Nuha", "Karthika"]),
        st("Sanya", "Sanya_3", "Math", 3, &["Ishita", "Abhigya", "Sathvik"]),
        st("Sanya", "Sanya_4", "Math", 3, &["Neil", "Mohammad"]),
        // Usha (Math)
        st("Usha", "Usha_1", "Math", 3, &["Anshika", "Asmi", "Arjun", "Arhat"]),
        st("Usha", "Usha_2", "Math", 3, &["Aashmi", "Arhan", "Trisha", "Vedaant", "Kanav"]),
        st("Usha", "Usha_3", "Math", 3, &["Archana", "Myra", "Mythili", "Shlok"]),
        st("Usha", "Usha_4", "Math", 2, &["Anik", "Sahan", "Sayan"]),
        st("Usha", "Usha_5", "Math", 3, &["Sruthi"]),
        // Gayatri (English)
        st("Gayatri", "Eng_1", "English", 2, &["Ekaansh", "Aakash"]),
        st(
            "Gayatri",
            "Eng_2",
            "English",
            2,
            &["Aashmi", "Abhigya", "Ishita", "Neil", "Nithil", "Sathvik", "Sayan", "Arjun", "Mohammad"],
        ),
        st(
            "Gayatri",
            "Eng_3",
            "English",
            2,
            &["Anik", "Parth", "Arhan", "Arhat", "Karthika", "Kanav"],
        ),
        st(
            "Gayatri",
            "Eng_4",
            "English",
            1,
            &["Anshika", "Archana", "Myra", "Mythili", "Trisha"],
        ),
        st(
            "Gayatri",
            "Eng_5",
            "English",
            1,
            &["Asmi", "Nuha", "Sahan", "Shlok", "Sruthi", "Vedaant"],
        ),
        // Shravani (Science)
        st(
            "Shravani",
            "Sci_1",
            "Science",
            3,
            &["Neil", "Aakash", "Arhat", "Abhigya", "Sruthi"],
        ),
        st(
            "Shravani",
            "Sci_2",
            "Science",
            3,
            &["Mohammad", "Ekaansh", "Ishita", "Nuha", "Karthika"],
        ),
        // Zeba (SST plus an English cover)
        st(
            "Zeba",
            "SST_1",
            "SST",
            3,
            &["Arhat", "Neil", "Parth", "Ekaansh", "Karthika", "Nithil", "Aakash"],
        ),
        st("Zeba", "SST_2", "SST", 3, &["Anik", "Mohammad", "Arjun", "Sathvik"]),
        st(
            "Zeba",
            "SST_3",
            "SST",
            2,
            &["Kanav", "Abhigya", "Sruthi", "Nuha", "Sahan", "Sayan", "Ishita"],
        ),
        st(
            "Zeba",
            "SST_4",
            "SST",
            2,
            &["Arhan", "Asmi", "Anshika", "Trisha", "Aashmi"],
        ),
        st(
            "Zeba",
            "SST_5",
            "SST",
            2,
            &["Myra", "Mythili", "Archana", "Vedaant", "Shlok"],
        ),
        st("Zeba", "Eng_1", "English", 1, &["Ekaansh", "Aakash"]),
        // Guru (Science plus a Math cover)
        st(
            "Guru",
            "Sci_3",
            "Science",
            2,
            &["Aashmi", "Vedaant", "Anshika", "Archana", "Asmi", "Sahan"],
        ),
        st(
            "Guru",
            "Sci_4",
            "Science",
            2,
            &["Arhan", "Arjun", "Nithil", "Parth", "Sathvik", "Anik"],
        ),
        st(
            "Guru",
            "Sci_5",
            "Science",
            2,
            &["Kanav", "Myra", "Sayan", "Trisha", "Mythili", "Shlok"],
        ),
        st("Guru", "Sanya_1", "Math", 1, &["Ekaansh", "Parth"]),
    ]
}

pub fn load_data() -> TimetableData {
    TimetableData::new(slots_by_day(), teacher_availability(), &session_templates())
}
