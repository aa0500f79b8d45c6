use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(TeacherId);
id_newtype!(StudentId);

/// Lesson period within a day, 1..=5.
pub type Slot = u8;
/// Parallel lane within a (day, slot), 1..=4, assigned after solving.
pub type Track = u8;

pub const SLOT_MIN: Slot = 1;
pub const SLOT_MAX: Slot = 5;
/// At most this many sessions may run in parallel in one (day, slot).
pub const TRACKS_PER_SLOT: usize = 4;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    /// Position in the canonical week order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repeating lesson as entered by the school: expanded into
/// `multiplicity` separately-placed instances before solving.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionTemplate {
    pub teacher: TeacherId,
    pub code: String,
    pub subject: String,
    pub multiplicity: u32,
    pub students: Vec<StudentId>,
}

impl SessionTemplate {
    pub fn new(
        teacher: &str,
        code: &str,
        subject: &str,
        multiplicity: u32,
        students: &[&str],
    ) -> Self {
        Self {
            teacher: teacher.into(),
            code: code.to_string(),
            subject: subject.to_string(),
            multiplicity,
            students: students.iter().copied().map(StudentId::from).collect(),
        }
    }
}

/// One concrete meeting to be placed exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionInstance {
    pub uid: String,
    pub teacher: TeacherId,
    pub code: String,
    pub subject: String,
    pub students: Vec<StudentId>,
}

pub fn expand_templates(templates: &[SessionTemplate]) -> Vec<SessionInstance> {
    let mut expanded = Vec::new();
    for template in templates {
        for k in 1..=template.multiplicity {
            expanded.push(SessionInstance {
                uid: format!("{}_{}_{}", template.code, template.teacher, k),
                teacher: template.teacher.clone(),
                code: template.code.clone(),
                subject: template.subject.clone(),
                students: template.students.clone(),
            });
        }
    }
    expanded
}

/// The full static input, constructed once and immutable for the solve.
#[derive(Clone, Debug)]
pub struct TimetableData {
    pub slots_by_day: BTreeMap<Day, Vec<Slot>>,
    pub teacher_availability: HashMap<TeacherId, HashSet<(Day, Slot)>>,
    pub sessions: Vec<SessionInstance>,
    pub teachers: Vec<TeacherId>,
    pub students: Vec<StudentId>,
}

impl TimetableData {
    pub fn new(
        slots_by_day: BTreeMap<Day, Vec<Slot>>,
        teacher_availability: HashMap<TeacherId, HashSet<(Day, Slot)>>,
        templates: &[SessionTemplate],
    ) -> Self {
        let sessions = expand_templates(templates);
        let teachers: BTreeSet<TeacherId> = sessions.iter().map(|s| s.teacher.clone()).collect();
        let students: BTreeSet<StudentId> = sessions
            .iter()
            .flat_map(|s| s.students.iter().cloned())
            .collect();
        Self {
            slots_by_day,
            teacher_availability,
            sessions,
            teachers: teachers.into_iter().collect(),
            students: students.into_iter().collect(),
        }
    }

    pub fn is_teacher_available(&self, teacher: &TeacherId, day: Day, slot: Slot) -> bool {
        self.teacher_availability
            .get(teacher)
            .map_or(false, |av| av.contains(&(day, slot)))
    }

    /// Slots permitted on `day`, ascending. Days absent from the table have none.
    pub fn slots_on(&self, day: Day) -> &[Slot] {
        self.slots_by_day.get(&day).map_or(&[], Vec::as_slice)
    }
}

/// One placed session in the final timetable.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Entry {
    pub day: Day,
    pub slot: Slot,
    pub track: Track,
    pub teacher: TeacherId,
    pub code: String,
    pub subject: String,
    pub students: Vec<StudentId>,
}

/// The published result: frozen after the startup solve.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct TimetablePayload {
    pub days: Vec<Day>,
    pub slots: Vec<Slot>,
    pub entries: Vec<Entry>,
    pub teachers: Vec<TeacherId>,
    pub students: Vec<StudentId>,
}

impl TimetablePayload {
    pub fn new(data: &TimetableData, entries: Vec<Entry>) -> Self {
        Self {
            days: Day::ALL.to_vec(),
            slots: (SLOT_MIN..=SLOT_MAX).collect(),
            entries,
            teachers: data.teachers.clone(),
            students: data.students.clone(),
        }
    }
}
