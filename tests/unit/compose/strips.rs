use super::*;

fn assert_covers(height: u32, ranges: &[Range<u32>]) {
    let mut next = 0;
    for r in ranges {
        assert_eq!(r.start, next);
        assert!(r.end >= r.start);
        next = r.end;
    }
    assert_eq!(next, height);
}

#[test]
fn even_split() {
    assert_eq!(partition_rows(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
}

#[test]
fn remainder_goes_to_leading_strips() {
    assert_eq!(partition_rows(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
}

#[test]
fn more_parts_than_rows_caps_at_one_row_per_strip() {
    assert_eq!(partition_rows(3, 5), vec![0..1, 1..2, 2..3]);
}

#[test]
fn huge_part_count_does_not_allocate_per_part() {
    assert_eq!(partition_rows(4, usize::MAX), vec![0..1, 1..2, 2..3, 3..4]);
    assert_eq!(partition_rows(0, usize::MAX), vec![0..0]);
}

#[test]
fn zero_parts_is_one_strip() {
    assert_eq!(partition_rows(7, 0), vec![0..7]);
}

#[test]
fn always_covers_height_contiguously() {
    for height in [1u32, 2, 7, 31, 100, 257] {
        for parts in [1usize, 2, 3, 5, 17, 64, 300] {
            let ranges = partition_rows(height, parts);
            assert_eq!(ranges.len(), parts.min(height as usize));
            assert!(ranges.iter().all(|r| !r.is_empty()));
            assert_covers(height, &ranges);
            let lens: Vec<u32> = ranges.iter().map(|r| r.end - r.start).collect();
            let max = *lens.iter().max().unwrap();
            let min = *lens.iter().min().unwrap();
            assert!(max - min <= 1, "h={height} parts={parts} {lens:?}");
        }
    }
}
