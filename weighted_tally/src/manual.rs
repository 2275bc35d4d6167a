/*!

This is the long-form manual for `weighted_tally` and `ballotsim`.

## Weighted tally

Every unit of the association carries a *beneficial interest*, its share of
the voting power. The interests of all the units normally add up to 100, but
this is not checked: the tally is always relative to the sum of the
interests present in the table.

A unit has voted if the vote cell contains exactly `YES` or `NO`. Any other
content, including the placeholder `Click to Cast Your Vote`, a blank cell or
a lowercase `yes`, counts as not voted. The three results are:

* the YES share: interest of the `YES` rows divided by the total interest
* the NO share: interest of the `NO` rows divided by the total interest
* the non-voter share: the rest of the interest divided by the total interest

If the total interest is zero, all three shares are zero.

## Percentages

Shares are displayed as percentages with two decimals, always truncated:
a YES share of `0.66666` is shown as `66.66`, never `66.67`. The
truncation works on the decimal digits of the share, so `0.57` is shown as
`57.00`.

## Input formats

`ballotsim` reads the ballot table from these formats:

### `csv`

A comma separated file with a header row. By default the columns are found
by their header: `Unit Number`, `Beneficial Interest` and `Vote`. The vote
column is optional, a table without it is a ballot where nobody voted yet.

```text
Unit Number,Beneficial Interest,Vote
0101,0.52,YES
0102,0.48,Click to Cast Your Vote
```

### `excel`

An Excel workbook (.xlsx) with the same layout as the CSV input. The
worksheet is chosen with `--excel-worksheet-name`, the first one is used
otherwise.

## Configuration

The columns can be given explicitly in a JSON configuration file, as a
number (starting at 1), an Excel column letter or a header name:

```json
{
  "outputSettings": { "contestName": "Roof replacement" },
  "ballotFileSources": [
    {
      "provider": "csv",
      "filePath": "owners_vote.csv",
      "unitColumnIndex": 1,
      "interestColumnIndex": "B",
      "voteColumnIndex": "Vote"
    }
  ],
  "rules": { "resetVotes": false }
}
```

When `resetVotes` is `true`, all the votes read from the file are replaced
by the placeholder `notVotedLabel` (default `Click to Cast Your Vote`)
before the `--vote` overrides are applied.
*/
