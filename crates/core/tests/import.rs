//! End-to-end parsing of pasted portal text.

use tkb2ics_core::{parse, parse_exam, parse_schedule, Day, Import, Kind, Term};

const TIMETABLE: &str = "\
**251**CO1234Lập trình1 2 2 7 2 07:00 - 09:50H1-101BK-LTK|--|x|x|--|--|--|--|--|--
**251**CO1234Lập trình1 2 2 7 2 07:00 - 09:50H1-101BK-LTK|--|--|--|--|--|--|--|--|--

**251**MT1003Giải tích4 4 L02 3 2-4 9:00 - 10:50 H2-202 BK-DAn|x|x|x|x|x|x|x|x|x
Mã MH Tên môn học Tín chỉ Tc học phí Nhóm tổ Thứ Tiết Giờ học Phòng Cơ sở Tuần học
**251**PH1003Vật lý3 3 L01 CN 13:00 - 15:50H3-301BK-LTK|x| |x
";

const EXAMS: &str = "\
Học kỳ Môn học Nhóm Ngày Loại Cơ sở Phòng Thứ Giờ Phút
20251 CO1234-Lập_trình L01 20/12/2025 CK BK-LTK H6-101 7 07:00 90
20251 MT1003-Giải_tích L02 22/12/2025 GK
20251 PH1003-Vật_lý L01 24/12/2025 CK BK-DAn H1-201 4 13:00 120
";

#[test]
fn timetable_keeps_well_formed_rows_in_order() {
	let entries = parse_schedule(TIMETABLE);

	let codes = entries
		.iter()
		.map(|entry| entry.subject_code.as_str())
		.collect::<Vec<_>>();
	assert_eq!(codes, ["CO1234", "MT1003", "PH1003"]);

	assert_eq!(entries[0].weeks, [26, 27]);
	assert_eq!(entries[1].weeks, (25..=33).collect::<Vec<_>>());
	assert_eq!(entries[1].day, Day::Tuesday);
	assert_eq!(entries[1].time.to_string(), "09:00 - 10:50");
	assert_eq!(entries[2].day, Day::Sunday);
	assert_eq!(entries[2].weeks, [25, 27]);
}

#[test]
fn duplicate_rows_are_kept() {
	let line = "**251**CO1234Lập trình1 2 2 7 2 07:00 - 09:50H1-101BK-LTK|x";
	let text = format!("{line}\n{line}\n");

	assert_eq!(parse_schedule(&text).len(), 2);
}

#[test]
fn exams_skip_short_rows_only() {
	let exams = parse_exam(EXAMS);

	assert_eq!(exams.len(), 2);
	assert_eq!(exams[0].subject_code, "CO1234");
	assert_eq!(exams[0].day_of_week, 7);
	assert_eq!(exams[0].duration_minutes, 90);
	assert_eq!(exams[1].subject_code, "PH1003");
	assert_eq!(exams[1].duration_minutes, 120);
}

#[test]
fn dispatch_follows_kind() {
	let schedule = parse(Kind::Schedule, TIMETABLE);
	let exam = parse(Kind::Exam, EXAMS);

	assert!(matches!(&schedule, Import::Schedule(entries) if entries.len() == 3));
	assert!(matches!(&exam, Import::Exam(entries) if entries.len() == 2));

	// each parser ignores the other's rows
	assert!(parse(Kind::Exam, TIMETABLE).is_empty());
	assert!(parse(Kind::Schedule, EXAMS).is_empty());
}

#[test]
fn one_row_per_entry_and_week() {
	let import = parse(Kind::Schedule, TIMETABLE);
	let occurrences = import.occurrences(&Term::default());

	assert_eq!(occurrences.len(), 2 + 9 + 2);
	assert!(occurrences
		.iter()
		.all(|occurrence| Term::default().week_of(occurrence.start.date()) == Some(occurrence.week)));
	assert_eq!(import.subjects().len(), 3);
}

#[test]
fn entries_serialize_with_camel_case_keys() {
	let import = parse(
		Kind::Schedule,
		"**251**CO1234Lập trình1 2 2 7 2 7:00 - 9:50H1-101BK-LTK|--|x|x",
	);
	let json = serde_json::to_value(&import).unwrap();

	assert_eq!(json["kind"], "schedule");
	let entry = &json["entries"][0];
	assert_eq!(entry["subjectCode"], "CO1234");
	assert_eq!(entry["tuitionCredits"], 2);
	assert_eq!(entry["day"], "7");
	assert_eq!(entry["time"], "07:00 - 09:50");
	assert_eq!(entry["weeks"], serde_json::json!([26, 27]));
}
